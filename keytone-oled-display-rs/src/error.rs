//! Error types for the OLED display driver.

use core::fmt;

use display_interface::DisplayError;

/// Errors that can occur during OLED display operations.
///
/// `ssd1306` folds every bus error into [`DisplayError`], so this enum is
/// not generic over the I2C error type.
#[derive(Debug)]
pub enum OledError {
    /// Display interface error (I2C or other bus-level failure).
    Display(DisplayError),
    /// The controller did not accept the initialisation sequence.
    InitializationFailed,
    /// An operation was attempted before [`OledDriver::init()`](crate::OledDriver::init)
    /// succeeded.
    NotInitialized,
}

impl From<DisplayError> for OledError {
    fn from(e: DisplayError) -> Self {
        OledError::Display(e)
    }
}

impl fmt::Display for OledError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OledError::Display(e) => write!(f, "Display interface error: {:?}", e),
            OledError::InitializationFailed => write!(f, "Display initialisation failed"),
            OledError::NotInitialized => write!(f, "Display not initialised"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for OledError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            OledError::Display(e) => defmt::write!(f, "Display interface error: {}", defmt::Debug2Format(e)),
            OledError::InitializationFailed => defmt::write!(f, "Initialization failed"),
            OledError::NotInitialized => defmt::write!(f, "Not initialized"),
        }
    }
}
