//! Hardware interface abstraction
//!
//! This module provides the [`LedInterface`] trait and the [`Interface`] struct
//! for clocking frames into a MAX7219/MAX7221 chain.
//!
//! ## Hardware Requirements
//!
//! The chain needs three GPIO outputs:
//! - **DIN**: serial data
//! - **CLK**: serial clock, data sampled on the rising edge
//! - **LOAD/CS**: latches the shifted packets on the rising edge
//!
//! No SPI peripheral is required; [`Interface`] bit-bangs the protocol.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::digital::OutputPin;
//! use ledcontrol::{command, Frame, Interface, LedInterface};
//! # use core::convert::Infallible;
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! // Create interface with data, clock and chip-select pins
//! let mut interface = Interface::new(MockPin, MockPin, MockPin);
//!
//! // Bring the only chip in the chain out of shutdown
//! if let Some(frame) = Frame::new(1, 0, command::SHUTDOWN, 0x01) {
//!     let _ = interface.write_frame(&frame);
//! }
//! ```

use core::fmt::Debug;
use embedded_hal::digital::{OutputPin, PinState};

use crate::frame::Frame;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Trait for hardware interface to a MAX7219 chain
///
/// This trait abstracts over different hardware implementations,
/// allowing [`LedControl`](crate::display::LedControl) to work with
/// bit-banged pins, a hardware SPI bus, or a test double.
///
/// ## Implementing
///
/// For most cases, use the provided [`Interface`] struct. Implement
/// [`select`](Self::select), [`deselect`](Self::deselect) and
/// [`shift_out`](Self::shift_out); [`write_frame`](Self::write_frame)
/// has a default built on top of them.
pub trait LedInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Drive LOAD/CS low to start a frame
    ///
    /// # Errors
    ///
    /// Returns an error if the GPIO write fails.
    fn select(&mut self) -> InterfaceResult<(), Self::Error>;

    /// Drive LOAD/CS high, latching the shifted packets
    ///
    /// # Errors
    ///
    /// Returns an error if the GPIO write fails.
    fn deselect(&mut self) -> InterfaceResult<(), Self::Error>;

    /// Clock one byte out, most significant bit first
    ///
    /// # Errors
    ///
    /// Returns an error if the GPIO write fails.
    fn shift_out(&mut self, byte: u8) -> InterfaceResult<(), Self::Error>;

    /// Send a complete frame in one chip-select pulse
    ///
    /// Bytes go out in [`Frame::wire_order`], so the last device's packet
    /// enters the chain first and ends up furthest along it.
    ///
    /// If shifting fails, LOAD/CS is still released before the error is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns the first GPIO error encountered.
    fn write_frame(&mut self, frame: &Frame) -> InterfaceResult<(), Self::Error> {
        self.select()?;
        for byte in frame.wire_order() {
            if let Err(e) = self.shift_out(byte) {
                let _ = self.deselect();
                return Err(e);
            }
        }
        self.deselect()
    }
}

/// Errors that can occur at the interface level
///
/// Identifies which of the three lines failed.
#[derive(Debug)]
pub enum InterfaceError<PinErr> {
    /// DIN pin error
    Data(PinErr),
    /// CLK pin error
    Clock(PinErr),
    /// LOAD/CS pin error
    Select(PinErr),
}

impl<PinErr: Debug> core::fmt::Display for InterfaceError<PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Data(e) => write!(f, "Data pin error: {e:?}"),
            Self::Clock(e) => write!(f, "Clock pin error: {e:?}"),
            Self::Select(e) => write!(f, "Chip select pin error: {e:?}"),
        }
    }
}

impl<PinErr: Debug> core::error::Error for InterfaceError<PinErr> {}

/// Bit-banged interface implementation
///
/// Implements [`LedInterface`] on three embedded-hal v1.0 output pins.
///
/// ## Type Parameters
///
/// * `DATA` - DIN pin implementing [`OutputPin`]
/// * `CLK` - CLK pin implementing [`OutputPin`]
/// * `CS` - LOAD/CS pin implementing [`OutputPin`]
///
/// All three pins must share one error type.
pub struct Interface<DATA, CLK, CS> {
    /// Serial data pin
    data: DATA,
    /// Serial clock pin (idle low)
    clock: CLK,
    /// Load / chip select pin (idle high)
    cs: CS,
}

impl<DATA, CLK, CS> Interface<DATA, CLK, CS>
where
    DATA: OutputPin,
    CLK: OutputPin,
    CS: OutputPin,
{
    /// Create a new Interface
    ///
    /// The pins are not touched until the first frame;
    /// [`LedControl::init`](crate::LedControl::init) releases LOAD/CS before
    /// programming the chain.
    ///
    /// # Arguments
    ///
    /// * `data` - DIN pin (output)
    /// * `clock` - CLK pin (output)
    /// * `cs` - LOAD/CS pin (output)
    pub fn new(data: DATA, clock: CLK, cs: CS) -> Self {
        Self { data, clock, cs }
    }

    /// Give the pins back
    pub fn release(self) -> (DATA, CLK, CS) {
        (self.data, self.clock, self.cs)
    }
}

impl<DATA, CLK, CS, PinErr> LedInterface for Interface<DATA, CLK, CS>
where
    DATA: OutputPin<Error = PinErr>,
    CLK: OutputPin<Error = PinErr>,
    CS: OutputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<PinErr>;

    fn select(&mut self) -> InterfaceResult<(), Self::Error> {
        self.cs.set_low().map_err(InterfaceError::Select)
    }

    fn deselect(&mut self) -> InterfaceResult<(), Self::Error> {
        self.cs.set_high().map_err(InterfaceError::Select)
    }

    fn shift_out(&mut self, byte: u8) -> InterfaceResult<(), Self::Error> {
        for bit in (0..8).rev() {
            let level = PinState::from(byte & (1 << bit) != 0);
            self.data.set_state(level).map_err(InterfaceError::Data)?;
            self.clock.set_high().map_err(InterfaceError::Clock)?;
            self.clock.set_low().map_err(InterfaceError::Clock)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as MockState, Transaction as PinTransaction,
    };

    fn data_bits(byte: u8) -> Vec<PinTransaction> {
        (0..8)
            .rev()
            .map(|bit| {
                if byte & (1 << bit) != 0 {
                    PinTransaction::set(MockState::High)
                } else {
                    PinTransaction::set(MockState::Low)
                }
            })
            .collect()
    }

    fn clock_pulses(count: usize) -> Vec<PinTransaction> {
        (0..count)
            .flat_map(|_| {
                [
                    PinTransaction::set(MockState::High),
                    PinTransaction::set(MockState::Low),
                ]
            })
            .collect()
    }

    #[test]
    fn test_shift_out_msb_first() {
        let mut data = PinMock::new(&data_bits(0b1010_0101));
        let mut clock = PinMock::new(&clock_pulses(8));
        let mut cs = PinMock::new(&[]);

        let mut interface = Interface::new(data.clone(), clock.clone(), cs.clone());
        interface.shift_out(0b1010_0101).unwrap();

        data.done();
        clock.done();
        cs.done();
    }

    #[test]
    fn test_write_frame_brackets_with_chip_select() {
        // Two devices, target device 0: device 1's no-op goes out first
        let frame = Frame::new(2, 0, 0x0C, 0x11).unwrap();
        let mut expected_data = Vec::new();
        for byte in [0x00u8, 0x00, 0x0C, 0x11] {
            expected_data.extend(data_bits(byte));
        }

        let mut data = PinMock::new(&expected_data);
        let mut clock = PinMock::new(&clock_pulses(4 * 8));
        let mut cs = PinMock::new(&[
            PinTransaction::set(MockState::Low),
            PinTransaction::set(MockState::High),
        ]);

        let mut interface = Interface::new(data.clone(), clock.clone(), cs.clone());
        interface.write_frame(&frame).unwrap();

        data.done();
        clock.done();
        cs.done();
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct PinFault;

    struct FaultyPin;

    impl embedded_hal::digital::Error for PinFault {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    impl embedded_hal::digital::ErrorType for FaultyPin {
        type Error = PinFault;
    }

    impl OutputPin for FaultyPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Err(PinFault)
        }
        fn set_high(&mut self) -> Result<(), Self::Error> {
            Err(PinFault)
        }
    }

    #[derive(Default)]
    struct FrameRecorder {
        selected: bool,
        deselects: usize,
        shifted: Vec<u8>,
        fail_on_shift: bool,
    }

    impl LedInterface for FrameRecorder {
        type Error = PinFault;

        fn select(&mut self) -> Result<(), Self::Error> {
            self.selected = true;
            Ok(())
        }

        fn deselect(&mut self) -> Result<(), Self::Error> {
            self.selected = false;
            self.deselects += 1;
            Ok(())
        }

        fn shift_out(&mut self, byte: u8) -> Result<(), Self::Error> {
            if self.fail_on_shift {
                return Err(PinFault);
            }
            self.shifted.push(byte);
            Ok(())
        }
    }

    #[test]
    fn test_write_frame_reverse_order() {
        let mut recorder = FrameRecorder::default();
        let frame = Frame::new(3, 1, 0x0A, 0x05).unwrap();
        recorder.write_frame(&frame).unwrap();
        assert_eq!(recorder.shifted, alloc::vec![0, 0, 0x0A, 0x05, 0, 0]);
        assert!(!recorder.selected);
        assert_eq!(recorder.deselects, 1);
    }

    #[test]
    fn test_write_frame_releases_select_on_error() {
        let mut recorder = FrameRecorder {
            fail_on_shift: true,
            ..FrameRecorder::default()
        };
        let frame = Frame::new(1, 0, 0x0C, 0x01).unwrap();
        assert_eq!(recorder.write_frame(&frame), Err(PinFault));
        assert!(!recorder.selected);
    }

    #[test]
    fn test_pin_errors_are_tagged() {
        let mut interface = Interface::new(FaultyPin, FaultyPin, FaultyPin);
        assert!(matches!(
            interface.select(),
            Err(InterfaceError::Select(PinFault))
        ));
        assert!(matches!(
            interface.shift_out(0xFF),
            Err(InterfaceError::Data(PinFault))
        ));
    }
}
