//! Daisy-chain frame construction
//!
//! A frame is the byte sequence shifted out during one LOAD/CS pulse. It holds
//! one 16-bit packet per chained device, stored low byte first: the data byte
//! for device `n` sits at index `2n` and its opcode at `2n + 1`. Every device
//! other than the target gets a [`NOOP`](crate::command::NOOP) packet.
//!
//! [`Frame::wire_order`] walks the bytes from the highest index down, which is
//! the order [`LedInterface::write_frame`](crate::LedInterface::write_frame)
//! clocks them out: the last device's packet goes first.
//!
//! ## Example
//!
//! ```
//! use ledcontrol::{command, Frame};
//!
//! // Three devices, target device 1
//! let frame = match Frame::new(3, 1, command::INTENSITY, 0x08) {
//!     Some(frame) => frame,
//!     None => return,
//! };
//! assert_eq!(frame.as_bytes(), &[0, 0, 0x08, command::INTENSITY, 0, 0]);
//! ```

use crate::command::NOOP;
use crate::error::MAX_DEVICES;

const MAX_FRAME_LEN: usize = MAX_DEVICES as usize * 2;

/// One chip-select frame for a chain of up to [`MAX_DEVICES`] devices
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    bytes: [u8; MAX_FRAME_LEN],
    len: usize,
}

impl Frame {
    /// Build a frame addressing `opcode`/`data` to device `addr`
    ///
    /// Returns `None` if `addr` is not below `devices` or `devices` exceeds
    /// [`MAX_DEVICES`].
    pub fn new(devices: u8, addr: u8, opcode: u8, data: u8) -> Option<Self> {
        if addr >= devices || devices > MAX_DEVICES {
            return None;
        }
        let mut bytes = [NOOP; MAX_FRAME_LEN];
        let offset = addr as usize * 2;
        bytes[offset] = data;
        bytes[offset + 1] = opcode;
        Some(Self {
            bytes,
            len: devices as usize * 2,
        })
    }

    /// Frame bytes in storage order (device 0 data byte first)
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Bytes in the order they are clocked onto the wire
    pub fn wire_order(&self) -> impl Iterator<Item = u8> + '_ {
        self.as_bytes().iter().rev().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn test_three_devices_middle_target() {
        let frame = Frame::new(3, 1, 0x0A, 0x05).unwrap();
        assert_eq!(frame.as_bytes(), &[0, 0, 0x05, 0x0A, 0, 0]);

        let wire: Vec<u8> = frame.wire_order().collect();
        assert_eq!(wire, alloc::vec![0, 0, 0x0A, 0x05, 0, 0]);
    }

    #[test]
    fn test_single_device_opcode_precedes_data_on_wire() {
        let frame = Frame::new(1, 0, 0x0C, 0x01).unwrap();
        let wire: Vec<u8> = frame.wire_order().collect();
        assert_eq!(wire, alloc::vec![0x0C, 0x01]);
    }

    #[test]
    fn test_last_device_is_shifted_first() {
        let frame = Frame::new(4, 3, 0x01, 0xFF).unwrap();
        let wire: Vec<u8> = frame.wire_order().collect();
        assert_eq!(&wire[..2], &[0x01, 0xFF]);
        assert!(wire[2..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_out_of_range_address() {
        assert_eq!(Frame::new(2, 2, 0x01, 0x00), None);
        assert_eq!(Frame::new(MAX_DEVICES + 1, 0, 0x01, 0x00), None);
    }

    #[test]
    fn test_full_chain_length() {
        let frame = Frame::new(MAX_DEVICES, MAX_DEVICES - 1, 0x08, 0xAA).unwrap();
        assert_eq!(frame.as_bytes().len(), MAX_FRAME_LEN);
        assert_eq!(frame.as_bytes()[MAX_FRAME_LEN - 1], 0x08);
        assert_eq!(frame.as_bytes()[MAX_FRAME_LEN - 2], 0xAA);
    }
}
