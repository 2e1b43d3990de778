//! Graphics support via embedded-graphics
//!
//! [`LedControl`] implements the
//! [`DrawTarget`](embedded_graphics_core::draw_target::DrawTarget) trait from
//! the embedded-graphics ecosystem when the chain is in [`Mode::Matrix`].
//!
//! The canvas is `8 * devices` pixels wide and 8 pixels high. Device 0 covers
//! columns 0-7, device 1 columns 8-15, and so on. [`BinaryColor::On`] lights
//! an LED.
//!
//! Every draw call works out the new row bytes first and then sends only the
//! rows whose byte changed, one frame per row. A row is recorded as shown only
//! once its frame went out, so a failed draw leaves the driver's view of the
//! display matching what the chips latched.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_graphics::{
//!     pixelcolor::BinaryColor,
//!     prelude::*,
//!     primitives::{Line, PrimitiveStyle},
//! };
//! use ledcontrol::{Builder, Interface, LedControl, Mode};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::OutputPin;
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! let interface = Interface::new(MockPin, MockPin, MockPin);
//! let config = match Builder::new().devices(4).mode(Mode::Matrix).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let mut leds = LedControl::new(interface, config);
//! let _ = leds.init();
//!
//! // Diagonal across the first two panels
//! let _ = Line::new(Point::new(0, 0), Point::new(15, 7))
//!     .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
//!     .draw(&mut leds);
//! ```

use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::BinaryColor,
    prelude::Pixel,
};

use crate::buffer::ROWS;
use crate::config::Mode;
use crate::display::LedControl;
use crate::error::{Error, MAX_DEVICES};
use crate::interface::LedInterface;

impl<I> DrawTarget for LedControl<I>
where
    I: LedInterface,
{
    type Color = BinaryColor;
    type Error = Error<I>;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        if self.mode() != Mode::Matrix {
            log::warn!("drawing needs a matrix chain");
            return Err(Error::UnsupportedMode);
        }
        self.flush_pending()?;

        let sz = self.size();
        let mut staged = [0u8; MAX_DEVICES as usize * ROWS];
        let shown = self.buffer().as_bytes();
        staged[..shown.len()].copy_from_slice(shown);

        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 {
                continue;
            }

            let x = x as u32;
            let y = y as u32;

            if x >= sz.width || y >= sz.height {
                continue;
            }

            let slot = &mut staged[(x / 8) as usize * ROWS + y as usize];
            let mask = 0x80 >> (x % 8);
            if color.is_on() {
                *slot |= mask;
            } else {
                *slot &= !mask;
            }
        }

        for addr in 0..self.devices() {
            for row in 0..ROWS as u8 {
                let value = staged[addr as usize * ROWS + row as usize];
                if value != self.buffer().row(addr, row) {
                    self.write_row(addr, row, value)?;
                }
            }
        }

        Ok(())
    }
}

impl<I> OriginDimensions for LedControl<I>
where
    I: LedInterface,
{
    fn size(&self) -> Size {
        Size::new(u32::from(self.devices()) * 8, ROWS as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::DIGIT0;
    use crate::config::Builder;
    use crate::frame::Frame;
    use alloc::vec::Vec;
    use embedded_graphics::{
        prelude::*,
        primitives::{Line, PrimitiveStyle, Rectangle},
    };

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct LinkDown;

    /// Records the storage-order bytes of every `write_frame` call
    #[derive(Debug, Default)]
    struct MockInterface {
        frames: Vec<Vec<u8>>,
        /// Frames accepted before every further write fails
        accept: Option<usize>,
    }

    impl LedInterface for MockInterface {
        type Error = LinkDown;

        fn select(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }

        fn deselect(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }

        fn shift_out(&mut self, _byte: u8) -> Result<(), Self::Error> {
            Ok(())
        }

        fn write_frame(&mut self, frame: &Frame) -> Result<(), Self::Error> {
            if let Some(accept) = self.accept {
                if accept == 0 {
                    return Err(LinkDown);
                }
                self.accept = Some(accept - 1);
            }
            self.frames.push(frame.as_bytes().to_vec());
            Ok(())
        }
    }

    fn test_control(devices: u8, mode: Mode) -> LedControl<MockInterface> {
        let config = Builder::new().devices(devices).mode(mode).build().unwrap();
        let mut control = LedControl::new(MockInterface::default(), config);
        control.init().unwrap();
        control
    }

    fn frame_count(control: &LedControl<MockInterface>) -> usize {
        control.interface().frames.len()
    }

    #[test]
    fn test_size_spans_chain() {
        let control = test_control(4, Mode::Matrix);
        assert_eq!(control.size(), Size::new(32, 8));
    }

    #[test]
    fn test_horizontal_line_crosses_devices() {
        let mut control = test_control(2, Mode::Matrix);
        let before = frame_count(&control);

        Line::new(Point::new(4, 3), Point::new(11, 3))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut control)
            .unwrap();

        assert_eq!(control.row(0, 3), Some(0x0F));
        assert_eq!(control.row(1, 3), Some(0xF0));
        // One frame per touched row
        let frames = &control.interface().frames[before..];
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], alloc::vec![0x0F, DIGIT0 + 3, 0, 0]);
        assert_eq!(frames[1], alloc::vec![0, 0, 0xF0, DIGIT0 + 3]);
    }

    #[test]
    fn test_vertical_line_sets_column_bit() {
        let mut control = test_control(1, Mode::Matrix);
        Line::new(Point::new(7, 0), Point::new(7, 7))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut control)
            .unwrap();
        assert_eq!(control.rows(0), Some(&[0x01u8; 8][..]));
    }

    #[test]
    fn test_unchanged_pixels_send_nothing() {
        let mut control = test_control(1, Mode::Matrix);
        let before = frame_count(&control);
        Pixel(Point::new(0, 0), BinaryColor::Off)
            .draw(&mut control)
            .unwrap();
        assert_eq!(frame_count(&control), before);
    }

    #[test]
    fn test_out_of_bounds_pixels_are_ignored() {
        let mut control = test_control(1, Mode::Matrix);
        let before = frame_count(&control);
        let pixels = [
            Pixel(Point::new(-1, 0), BinaryColor::On),
            Pixel(Point::new(0, -1), BinaryColor::On),
            Pixel(Point::new(8, 0), BinaryColor::On),
            Pixel(Point::new(0, 8), BinaryColor::On),
        ];
        control.draw_iter(pixels).unwrap();
        assert_eq!(frame_count(&control), before);
        assert_eq!(control.rows(0), Some(&[0u8; 8][..]));
    }

    #[test]
    fn test_fill_and_clear() {
        let mut control = test_control(2, Mode::Matrix);
        Rectangle::new(Point::zero(), Size::new(16, 8))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut control)
            .unwrap();
        assert_eq!(control.rows(1), Some(&[0xFFu8; 8][..]));

        DrawTarget::clear(&mut control, BinaryColor::Off).unwrap();
        assert_eq!(control.rows(0), Some(&[0u8; 8][..]));
        assert_eq!(control.rows(1), Some(&[0u8; 8][..]));
    }

    #[test]
    fn test_failed_draw_keeps_only_sent_rows() {
        let mut control = test_control(2, Mode::Matrix);
        let before = frame_count(&control);
        // Device 0 row 0 goes out, device 1 row 0 does not
        control.interface_mut().accept = Some(1);

        let result = Line::new(Point::new(0, 0), Point::new(15, 0))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut control);
        assert!(matches!(result, Err(Error::Interface(LinkDown))));

        assert_eq!(frame_count(&control), before + 1);
        assert_eq!(control.row(0, 0), Some(0xFF));
        assert_eq!(control.row(1, 0), Some(0x00));

        // Redrawing after recovery sends only the row that was lost
        control.interface_mut().accept = None;
        Line::new(Point::new(0, 0), Point::new(15, 0))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut control)
            .unwrap();
        assert_eq!(frame_count(&control), before + 2);
        assert_eq!(
            control.interface().frames.last(),
            Some(&alloc::vec![0, 0, 0xFF, DIGIT0])
        );
        assert_eq!(control.row(1, 0), Some(0xFF));
    }

    #[test]
    fn test_seven_segment_chain_rejects_drawing() {
        let mut control = test_control(1, Mode::SevenSegment);
        let before = frame_count(&control);
        let result = Pixel(Point::new(0, 0), BinaryColor::On).draw(&mut control);
        assert!(matches!(result, Err(Error::UnsupportedMode)));
        assert_eq!(frame_count(&control), before);
    }
}
