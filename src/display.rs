//! Core chain operations

use crate::buffer::{DisplayBuffer, ROWS};
use crate::command::{self, DECODE_MODE, DISPLAY_TEST, INTENSITY, SCAN_LIMIT, SHUTDOWN};
use crate::config::{CharRendering, Config, Mode};
use crate::error::Error;
use crate::font;
use crate::frame::Frame;
use crate::interface::LedInterface;

type ControlResult<'a, I> = core::result::Result<&'a mut LedControl<I>, Error<I>>;
type OpResult<T, I> = core::result::Result<T, Error<I>>;

/// Glyph rows waiting to be written in deferred rendering mode
#[derive(Clone, Copy, Debug, PartialEq)]
struct PendingGlyph {
    addr: u8,
    rows: [u8; 8],
    next: u8,
}

/// Driver for a chain of MAX7219/MAX7221 devices
///
/// Owns the interface and a copy of the last byte latched into every
/// digit/row register. Every operation validates its device address (and row, column or
/// digit index) before touching the buffer or the pins, and returns
/// `&mut Self` so calls can be chained with `?`.
///
/// ## Example
///
/// ```rust,no_run
/// use embedded_hal::digital::OutputPin;
/// use ledcontrol::{Builder, Interface, LedControl, Mode};
/// # use core::convert::Infallible;
/// # struct MockPin;
/// # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
/// # impl OutputPin for MockPin {
/// #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// # }
/// # fn run() -> Option<()> {
/// let interface = Interface::new(MockPin, MockPin, MockPin);
/// let config = Builder::new().devices(2).mode(Mode::Matrix).build().ok()?;
///
/// let mut leds = LedControl::new(interface, config);
/// leds.init().ok()?;
/// leds.on(0)
///     .and_then(|leds| leds.set_brightness(0, 8))
///     .and_then(|leds| leds.set_char(0, 0, 'R', false))
///     .ok()?;
/// # Some(())
/// # }
/// ```
pub struct LedControl<I>
where
    I: LedInterface,
{
    /// Hardware interface
    interface: I,
    /// Chain configuration
    config: Config,
    /// Last value latched into every digit/row register
    buffer: DisplayBuffer,
    /// Bit `n` set while device `n` is in normal operation
    powered: u8,
    /// Glyph queued by deferred `set_char`
    pending: Option<PendingGlyph>,
}

impl<I> LedControl<I>
where
    I: LedInterface,
{
    /// Create a new LedControl instance
    ///
    /// No frames are sent until [`init`](Self::init).
    pub fn new(interface: I, config: Config) -> Self {
        Self {
            interface,
            buffer: DisplayBuffer::new(config.devices),
            config,
            powered: 0,
            pending: None,
        }
    }

    /// Program every device into a known state
    ///
    /// Releases LOAD/CS, then for each device in ascending order: display test
    /// off, scan limit, raw (no-decode) mode, clear, shutdown. All devices
    /// end up blank and powered off.
    pub fn init(&mut self) -> ControlResult<'_, I> {
        self.pending = None;
        self.interface.deselect().map_err(Error::Interface)?;

        for addr in 0..self.config.devices {
            log::debug!("init device {addr}");
            self.send_frame(addr, DISPLAY_TEST, 0)?;
            self.send_frame(addr, SCAN_LIMIT, self.config.scan_limit)?;
            self.send_frame(addr, DECODE_MODE, 0)?;
            self.clear(addr)?;
            self.shutdown(addr, true)?;
        }
        Ok(self)
    }

    /// Send one command to one device
    ///
    /// Builds a frame with `opcode`/`data` in the slot for `addr` and no-ops
    /// for every other device, then clocks it out in a single LOAD/CS pulse.
    /// Queued glyph rows are written first. The display buffer is not
    /// updated; prefer the typed operations.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDevice` if `addr` is outside the chain.
    pub fn send(&mut self, addr: u8, opcode: u8, data: u8) -> ControlResult<'_, I> {
        self.check_device(addr)?;
        self.flush_pending()?;
        self.send_frame(addr, opcode, data)?;
        Ok(self)
    }

    /// Power a device down (`true`) or bring it into normal operation (`false`)
    ///
    /// Shutdown blanks the device but keeps its registers.
    pub fn shutdown(&mut self, addr: u8, shutdown: bool) -> ControlResult<'_, I> {
        self.check_device(addr)?;
        self.flush_pending()?;
        // SHUTDOWN register: 0 = shutdown, 1 = normal operation
        self.send_frame(addr, SHUTDOWN, u8::from(!shutdown))?;
        if shutdown {
            self.powered &= !(1 << addr);
        } else {
            self.powered |= 1 << addr;
        }
        log::debug!("device {addr} {}", if shutdown { "off" } else { "on" });
        Ok(self)
    }

    /// Bring a device into normal operation
    pub fn on(&mut self, addr: u8) -> ControlResult<'_, I> {
        self.shutdown(addr, false)
    }

    /// Put a device into shutdown
    pub fn off(&mut self, addr: u8) -> ControlResult<'_, I> {
        self.shutdown(addr, true)
    }

    /// Set how many digits/rows a device multiplexes (`limit` 0-7)
    ///
    /// The value is passed to the chip unchanged.
    pub fn set_scan_limit(&mut self, addr: u8, limit: u8) -> ControlResult<'_, I> {
        self.check_device(addr)?;
        self.flush_pending()?;
        self.send_frame(addr, SCAN_LIMIT, limit)?;
        Ok(self)
    }

    /// Set the PWM brightness of a device (`value` 0-15 on hardware)
    ///
    /// The value is not clamped; the chip only looks at the low nibble.
    pub fn set_brightness(&mut self, addr: u8, value: u8) -> ControlResult<'_, I> {
        self.check_device(addr)?;
        self.flush_pending()?;
        self.send_frame(addr, INTENSITY, value)?;
        Ok(self)
    }

    /// Enable or disable display test mode (every LED lit)
    pub fn set_display_test(&mut self, addr: u8, enabled: bool) -> ControlResult<'_, I> {
        self.check_device(addr)?;
        self.flush_pending()?;
        self.send_frame(addr, DISPLAY_TEST, u8::from(enabled))?;
        Ok(self)
    }

    /// Blank every digit/row of a device
    pub fn clear(&mut self, addr: u8) -> ControlResult<'_, I> {
        self.check_device(addr)?;
        self.flush_pending()?;
        for row in 0..ROWS as u8 {
            self.write_row(addr, row, 0)?;
        }
        Ok(self)
    }

    /// Blank every device in the chain
    pub fn clear_all(&mut self) -> ControlResult<'_, I> {
        for addr in 0..self.config.devices {
            self.clear(addr)?;
        }
        Ok(self)
    }

    /// Switch a single matrix LED on or off
    ///
    /// Column 0 is bit 7 of the row byte.
    pub fn set_led(&mut self, addr: u8, row: u8, col: u8, state: bool) -> ControlResult<'_, I> {
        self.check_device(addr)?;
        Self::check_index(row)?;
        Self::check_index(col)?;
        self.flush_pending()?;
        let mask = 0x80 >> col;
        let current = self.buffer.row(addr, row);
        let value = if state { current | mask } else { current & !mask };
        self.write_row(addr, row, value)?;
        Ok(self)
    }

    /// Overwrite a whole matrix row
    pub fn set_row(&mut self, addr: u8, row: u8, value: u8) -> ControlResult<'_, I> {
        self.check_device(addr)?;
        Self::check_index(row)?;
        self.flush_pending()?;
        self.write_row(addr, row, value)?;
        Ok(self)
    }

    /// Overwrite a whole matrix column
    ///
    /// Bit 7 of `value` goes to row 0, bit 0 to row 7. Each row is updated
    /// with [`set_led`](Self::set_led), top row first.
    pub fn set_column(&mut self, addr: u8, col: u8, value: u8) -> ControlResult<'_, I> {
        self.check_device(addr)?;
        Self::check_index(col)?;
        for row in 0..ROWS as u8 {
            let bit = (value >> (7 - row)) & 0x01;
            self.set_led(addr, row, col, bit == 1)?;
        }
        Ok(self)
    }

    /// Show a value on a 7-segment digit
    ///
    /// `value` indexes [`font::SEGMENTS`]; values above 127 show blank.
    /// `decimal_point` lights the DP segment.
    pub fn set_digit(
        &mut self,
        addr: u8,
        digit: u8,
        value: u8,
        decimal_point: bool,
    ) -> ControlResult<'_, I> {
        self.write_segments(addr, digit, font::segment(value), decimal_point)
    }

    /// Show a character
    ///
    /// - Matrix mode: draws the glyph for `value` across rows 0-7 of `addr`;
    ///   `digit` and `decimal_point` are ignored. Rows are written now or
    ///   queued, depending on [`CharRendering`].
    /// - 7-segment mode: same as [`set_digit`](Self::set_digit) with the
    ///   character's code point as the value.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedChar` in matrix mode if `value` has no glyph.
    pub fn set_char(
        &mut self,
        addr: u8,
        digit: u8,
        value: char,
        decimal_point: bool,
    ) -> ControlResult<'_, I> {
        match self.config.mode {
            Mode::SevenSegment => {
                self.write_segments(addr, digit, font::segment_for_char(value), decimal_point)
            }
            Mode::Matrix => {
                self.check_device(addr)?;
                let Some(&glyph) = font::glyph(value) else {
                    log::warn!("no glyph for {value:?}");
                    return Err(Error::UnsupportedChar(value));
                };
                self.flush_pending()?;
                match self.config.char_rendering {
                    CharRendering::Immediate => {
                        for (row, byte) in glyph.iter().enumerate() {
                            self.set_row(addr, row as u8, *byte)?;
                        }
                    }
                    CharRendering::Deferred => {
                        self.pending = Some(PendingGlyph {
                            addr,
                            rows: glyph,
                            next: 0,
                        });
                    }
                }
                Ok(self)
            }
        }
    }

    /// Write the next queued glyph row, if any
    ///
    /// Call once per turn of the application loop. Returns `true` if a row
    /// was written. A failed write stays queued.
    pub fn poll(&mut self) -> OpResult<bool, I> {
        let Some(mut pending) = self.pending.take() else {
            return Ok(false);
        };
        let row = pending.next;
        let value = pending.rows[row as usize];
        if let Err(e) = self.write_row(pending.addr, row, value) {
            self.pending = Some(pending);
            return Err(e);
        }
        pending.next += 1;
        if (pending.next as usize) < ROWS {
            self.pending = Some(pending);
        }
        Ok(true)
    }

    /// Write every queued glyph row
    pub fn flush(&mut self) -> ControlResult<'_, I> {
        self.flush_pending()?;
        Ok(self)
    }

    /// Whether deferred glyph rows are waiting to be written
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of chained devices
    pub fn devices(&self) -> u8 {
        self.config.devices
    }

    /// Display mode
    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Last values written to the rows/digits of `addr`
    ///
    /// Returns `None` for an address outside the chain.
    pub fn rows(&self, addr: u8) -> Option<&[u8]> {
        (addr < self.config.devices).then(|| self.buffer.device(addr))
    }

    /// Last value written to one row/digit
    pub fn row(&self, addr: u8, row: u8) -> Option<u8> {
        (addr < self.config.devices && (row as usize) < ROWS).then(|| self.buffer.row(addr, row))
    }

    /// Whether a device is in normal operation
    pub fn is_on(&self, addr: u8) -> bool {
        addr < self.config.devices && self.powered & (1 << addr) != 0
    }

    /// Access the underlying interface
    pub fn interface(&self) -> &I {
        &self.interface
    }

    /// Mutable access to the underlying interface
    ///
    /// Frames sent through it directly bypass the display buffer.
    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Consume the driver and return the interface
    pub fn release(self) -> I {
        self.interface
    }

    #[cfg(feature = "graphics")]
    pub(crate) fn buffer(&self) -> &DisplayBuffer {
        &self.buffer
    }

    /// Send one digit/row register and record it in the buffer once latched
    pub(crate) fn write_row(&mut self, addr: u8, row: u8, value: u8) -> OpResult<(), I> {
        let Some(opcode) = command::digit(row) else {
            return Err(Error::InvalidIndex { index: row });
        };
        self.send_frame(addr, opcode, value)?;
        self.buffer.set_row(addr, row, value);
        Ok(())
    }

    fn send_frame(&mut self, addr: u8, opcode: u8, data: u8) -> OpResult<(), I> {
        let devices = self.config.devices;
        let Some(frame) = Frame::new(devices, addr, opcode, data) else {
            return Err(Error::InvalidDevice { addr, devices });
        };
        log::trace!("device {addr}: opcode {opcode:#04x} data {data:#04x}");
        self.interface.write_frame(&frame).map_err(Error::Interface)
    }

    pub(crate) fn flush_pending(&mut self) -> OpResult<(), I> {
        while self.poll()? {}
        Ok(())
    }

    fn write_segments(
        &mut self,
        addr: u8,
        digit: u8,
        pattern: u8,
        decimal_point: bool,
    ) -> ControlResult<'_, I> {
        self.check_device(addr)?;
        Self::check_index(digit)?;
        self.flush_pending()?;
        let value = if decimal_point {
            pattern | font::DECIMAL_POINT
        } else {
            pattern
        };
        self.write_row(addr, digit, value)?;
        Ok(self)
    }

    pub(crate) fn check_device(&self, addr: u8) -> OpResult<(), I> {
        let devices = self.config.devices;
        if addr >= devices {
            log::warn!("device {addr} out of range (chain has {devices})");
            return Err(Error::InvalidDevice { addr, devices });
        }
        Ok(())
    }

    fn check_index(index: u8) -> OpResult<(), I> {
        if index as usize >= ROWS {
            log::warn!("row/column/digit {index} out of range");
            return Err(Error::InvalidIndex { index });
        }
        Ok(())
    }
}
