//! MAX7219/MAX7221 LED Driver
//!
//! A driver for daisy-chained MAX7219/MAX7221 LED controllers driving 8x8 dot
//! matrices or 7-segment displays, up to 8 chips per chain.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support, bit-banged over three output pins
//! - Display buffer mirroring every row/digit register
//! - Built-in 7-segment and 8x8 matrix fonts
//! - Deferred glyph rendering for cooperative main loops
//! - `embedded-graphics` integration (with `graphics` feature)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::digital::OutputPin;
//! use ledcontrol::{Builder, Interface, LedControl, Mode};
//!
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # let din = MockPin;
//! # let clk = MockPin;
//! # let load = MockPin;
//! let interface = Interface::new(din, clk, load);
//! let config = match Builder::new().devices(1).mode(Mode::SevenSegment).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut leds = LedControl::new(interface, config);
//! let _ = leds.init();
//! let _ = leds.on(0);
//! for digit in 0..8 {
//!     let _ = leds.set_digit(0, digit, digit, false);
//! }
//! ```

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

/// Display buffer mirroring the chip registers
pub(crate) mod buffer;
/// MAX7219/MAX7221 register opcodes
pub mod command;
/// Chain configuration types and builder
pub mod config;
/// Core chain operations
pub mod display;
/// Error types for the driver
pub mod error;
/// 7-segment and 8x8 matrix fonts
pub mod font;
/// Daisy-chain frame construction
pub mod frame;
/// Hardware interface abstraction
pub mod interface;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

pub use config::{Builder, CharRendering, Config, MAX_DEVICES, Mode};
pub use display::LedControl;
pub use error::{BuilderError, Error};
pub use frame::Frame;
pub use interface::InterfaceError;
pub use interface::{Interface, LedInterface};
