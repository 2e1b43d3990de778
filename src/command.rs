//! MAX7219/MAX7221 register opcodes
//!
//! Every command on the wire is a 16-bit packet: an opcode byte (the register
//! address, D15-D8) followed by a data byte (D7-D0). Both bytes are clocked
//! out most-significant bit first while LOAD/CS is low; the packet is latched
//! when LOAD/CS rises.
//!
//! ## Daisy Chaining
//!
//! Chained chips pass bits through from DOUT to the next chip's DIN. A frame
//! therefore carries one packet per chip, and every chip other than the
//! target receives [`NOOP`] so it ignores the write.
//!
//! ## Example
//!
//! ```
//! use ledcontrol::command;
//!
//! assert_eq!(command::digit(0), Some(command::DIGIT0));
//! assert_eq!(command::digit(7), Some(command::DIGIT7));
//! assert_eq!(command::digit(8), None);
//! ```

/// No-op command (0x00)
///
/// Chips receiving this opcode leave every register untouched.
pub const NOOP: u8 = 0x00;

// Digit / row registers

/// Digit 0 register (0x01), row 0 on a matrix
pub const DIGIT0: u8 = 0x01;
/// Digit 1 register (0x02)
pub const DIGIT1: u8 = 0x02;
/// Digit 2 register (0x03)
pub const DIGIT2: u8 = 0x03;
/// Digit 3 register (0x04)
pub const DIGIT3: u8 = 0x04;
/// Digit 4 register (0x05)
pub const DIGIT4: u8 = 0x05;
/// Digit 5 register (0x06)
pub const DIGIT5: u8 = 0x06;
/// Digit 6 register (0x07)
pub const DIGIT6: u8 = 0x07;
/// Digit 7 register (0x08), row 7 on a matrix
pub const DIGIT7: u8 = 0x08;

// Control registers

/// Decode mode command (0x09)
///
/// Selects Code-B BCD decoding per digit. This driver always writes `0x00`
/// (raw segment data for every digit).
pub const DECODE_MODE: u8 = 0x09;

/// Intensity command (0x0A)
///
/// PWM duty cycle, `0x00` (1/32) to `0x0F` (31/32) on the MAX7219.
pub const INTENSITY: u8 = 0x0A;

/// Scan limit command (0x0B)
///
/// Number of multiplexed digits minus one (`0x00` = digit 0 only,
/// `0x07` = all eight).
pub const SCAN_LIMIT: u8 = 0x0B;

/// Shutdown command (0x0C)
///
/// `0x00` = shutdown mode, `0x01` = normal operation.
pub const SHUTDOWN: u8 = 0x0C;

/// Display test command (0x0F)
///
/// `0x01` lights every LED regardless of digit registers, `0x00` = normal.
pub const DISPLAY_TEST: u8 = 0x0F;

/// Number of digit/row registers per chip
pub const DIGITS: u8 = 8;

/// Opcode of the digit/row register `index`
///
/// Returns `None` for `index >= 8`.
pub const fn digit(index: u8) -> Option<u8> {
    if index < DIGITS {
        Some(DIGIT0 + index)
    } else {
        None
    }
}
