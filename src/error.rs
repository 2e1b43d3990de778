//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and runtime operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors from [`LedControl`](crate::LedControl) operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level pin errors
//!
//! Rejected requests (bad address, index, character or mode) are reported
//! before the display buffer or any pin is touched.
//!
//! ## Example
//!
//! ```
//! use ledcontrol::{Builder, BuilderError};
//!
//! // Missing device count
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingDevices)));
//!
//! // Too many chips in the chain
//! let result = Builder::new().devices(9).build();
//! assert!(matches!(result, Err(BuilderError::InvalidDeviceCount { devices: 9 })));
//! ```

use crate::interface::LedInterface;

/// Maximum number of chained devices supported by the driver
///
/// The display buffer is a fixed 64-byte array (8 rows per device).
pub const MAX_DEVICES: u8 = 8;

/// Errors that can occur when driving the chain
///
/// Generic over the interface type to preserve the specific pin error type.
#[derive(Debug)]
pub enum Error<I: LedInterface> {
    /// Interface error (GPIO)
    ///
    /// Wraps the underlying hardware error from the [`LedInterface`] implementation.
    Interface(I::Error),
    /// Device address outside the configured chain
    InvalidDevice {
        /// Requested device address
        addr: u8,
        /// Number of devices in the chain
        devices: u8,
    },
    /// Row, column or digit index outside `0..8`
    InvalidIndex {
        /// Requested index
        index: u8,
    },
    /// No matrix glyph exists for the character
    UnsupportedChar(char),
    /// Operation only available in matrix mode
    UnsupportedMode,
}

impl<I: LedInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(_) => write!(f, "Interface error"),
            Self::InvalidDevice { addr, devices } => {
                write!(f, "Invalid device {addr} (chain has {devices} devices)")
            }
            Self::InvalidIndex { index } => {
                write!(f, "Invalid row/column/digit index {index} (must be 0-7)")
            }
            Self::UnsupportedChar(ch) => write!(f, "No matrix glyph for {ch:?}"),
            Self::UnsupportedMode => write!(f, "Operation requires matrix mode"),
        }
    }
}

impl<I: LedInterface + core::fmt::Debug> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
#[derive(Debug, PartialEq)]
pub enum BuilderError {
    /// Device count was not specified
    ///
    /// [`Builder::devices()`](crate::config::Builder::devices) must be called before building.
    MissingDevices,
    /// Device count outside `1..=MAX_DEVICES`
    InvalidDeviceCount {
        /// Number of devices requested
        devices: u8,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingDevices => write!(f, "Device count must be specified"),
            Self::InvalidDeviceCount { devices } => write!(
                f,
                "Invalid device count {devices} (must be 1-{MAX_DEVICES})"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}
