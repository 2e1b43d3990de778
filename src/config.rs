//! Chain configuration types and builder

pub use crate::error::{BuilderError, MAX_DEVICES};

/// Display personality of the chain
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Mode {
    /// 8x8 dot-matrix panels, one row per digit register
    Matrix,
    /// 7-segment numeric displays, one digit per digit register
    #[default]
    SevenSegment,
}

/// How matrix glyphs from [`set_char`](crate::LedControl::set_char) reach the chip
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum CharRendering {
    /// All eight rows are written before `set_char` returns
    #[default]
    Immediate,
    /// Rows are queued and written by later [`poll`](crate::LedControl::poll)
    /// or [`flush`](crate::LedControl::flush) calls
    ///
    /// Any other mutating call on the controller flushes the queue first.
    Deferred,
}

/// Chain configuration
///
/// Use [`Builder`] to create a Config.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Number of daisy-chained devices (1 to [`MAX_DEVICES`])
    pub devices: u8,
    /// Matrix or 7-segment interpretation
    pub mode: Mode,
    /// Glyph rendering policy in matrix mode
    pub char_rendering: CharRendering,
    /// Scan limit written to every device during init
    pub scan_limit: u8,
}

/// Builder for constructing chain configuration
///
/// # Example
///
/// ```
/// use ledcontrol::{Builder, Mode};
///
/// let config = match Builder::new().devices(4).mode(Mode::Matrix).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.devices, 4);
/// ```
#[must_use]
pub struct Builder {
    /// Number of devices (required)
    devices: Option<u8>,
    /// Matrix or 7-segment interpretation
    mode: Mode,
    /// Glyph rendering policy
    char_rendering: CharRendering,
    /// Scan limit written during init
    scan_limit: u8,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            devices: None,
            mode: Mode::SevenSegment,
            char_rendering: CharRendering::Immediate,
            // Scan all eight digits/rows
            scan_limit: 7,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of chained devices (required)
    pub fn devices(mut self, devices: u8) -> Self {
        self.devices = Some(devices);
        self
    }

    /// Set the display mode
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the glyph rendering policy
    pub fn char_rendering(mut self, rendering: CharRendering) -> Self {
        self.char_rendering = rendering;
        self
    }

    /// Set the scan limit used during init
    ///
    /// The value is passed to the chip as-is; only `0..=7` is meaningful.
    pub fn scan_limit(mut self, limit: u8) -> Self {
        self.scan_limit = limit;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingDevices` if the device count was not set,
    /// or `BuilderError::InvalidDeviceCount` if it is 0 or above [`MAX_DEVICES`].
    pub fn build(self) -> Result<Config, BuilderError> {
        let devices = self.devices.ok_or(BuilderError::MissingDevices)?;
        if devices == 0 || devices > MAX_DEVICES {
            return Err(BuilderError::InvalidDeviceCount { devices });
        }
        Ok(Config {
            devices,
            mode: self.mode,
            char_rendering: self.char_rendering,
            scan_limit: self.scan_limit,
        })
    }
}
