//! Display buffer
//!
//! The chips cannot be read back, so the driver keeps the last byte latched
//! into every digit/row register. Byte `device * 8 + row` mirrors register
//! `DIGIT<row>` of `device`.
//!
//! Crate-internal: [`LedControl`](crate::LedControl) checks every index before
//! it reaches the buffer, so the methods here assume `device < devices` and
//! `row < 8`.

use crate::error::MAX_DEVICES;

/// Rows (or digits) per device
pub const ROWS: usize = 8;

const CAPACITY: usize = MAX_DEVICES as usize * ROWS;

/// Last-latched register state for every device in the chain
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct DisplayBuffer {
    rows: [u8; CAPACITY],
    devices: u8,
}

impl DisplayBuffer {
    /// Create an all-zero buffer for `devices` chips
    pub fn new(devices: u8) -> Self {
        Self {
            rows: [0; CAPACITY],
            devices: devices.min(MAX_DEVICES),
        }
    }

    /// Row bytes of one device
    pub fn device(&self, device: u8) -> &[u8] {
        let start = Self::index(device, 0);
        &self.rows[start..start + ROWS]
    }

    /// Stored byte for one row
    pub fn row(&self, device: u8, row: u8) -> u8 {
        self.rows[Self::index(device, row)]
    }

    /// Overwrite one row
    pub fn set_row(&mut self, device: u8, row: u8, value: u8) {
        self.rows[Self::index(device, row)] = value;
    }

    /// All rows of the configured devices, device 0 first
    #[cfg(any(test, feature = "graphics"))]
    pub fn as_bytes(&self) -> &[u8] {
        &self.rows[..self.devices as usize * ROWS]
    }

    fn index(device: u8, row: u8) -> usize {
        device as usize * ROWS + row as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let buffer = DisplayBuffer::new(3);
        assert_eq!(buffer.as_bytes().len(), 24);
        assert!(buffer.as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_device_slices_do_not_overlap() {
        let mut buffer = DisplayBuffer::new(2);
        buffer.set_row(0, 7, 0xAA);
        buffer.set_row(1, 0, 0x55);
        assert_eq!(buffer.device(0)[7], 0xAA);
        assert_eq!(buffer.device(1)[0], 0x55);
        assert_eq!(buffer.as_bytes()[7], 0xAA);
        assert_eq!(buffer.as_bytes()[8], 0x55);
    }

    #[test]
    fn test_new_clamps_device_count() {
        let buffer = DisplayBuffer::new(MAX_DEVICES + 4);
        assert_eq!(buffer.as_bytes().len(), CAPACITY);
    }
}
