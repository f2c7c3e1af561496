//! Core OLED driver wrapping the `ssd1306` crate in async buffered graphics mode.
//!
//! [`OledDriver`] manages the panel lifecycle: construction without I2C
//! traffic, explicit async initialisation, rendering a [`DisplayState`]
//! into the frame buffer, and flushing it. The keyboard's SSD1305 panel
//! accepts the SSD1306 command set at 128×32.

use display_interface_i2c::I2CInterface;
use embedded_hal_async::i2c::I2c;
use ssd1306::{
    mode::BufferedGraphicsModeAsync, prelude::*, I2CDisplayInterface, Ssd1306Async,
};

use crate::error::OledError;
use crate::layout::{render_display, DisplayConfig, DisplayState};

/// I2C address of the display on the keyboard module.
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Concrete display type used internally by [`OledDriver`].
type Display<I2C> = Ssd1306Async<
    I2CInterface<I2C>,
    DisplaySize128x32,
    BufferedGraphicsModeAsync<DisplaySize128x32>,
>;

/// Async driver for a 128×32 SSD1306-family OLED display over I2C.
///
/// # Lifecycle
///
/// 1. [`OledDriver::new()`]: no I2C traffic.
/// 2. [`OledDriver::init()`]: sends the controller initialisation sequence.
///    The panel must already be powered and out of reset.
/// 3. [`OledDriver::draw()`]: renders a frame into the buffer.
/// 4. [`OledDriver::flush()`]: transfers the buffer to the panel.
///
/// # Example
///
/// ```ignore
/// use keytone_oled_display_rs::{DisplayConfig, DisplayState, OledDriver, DEFAULT_ADDRESS};
///
/// let mut oled = OledDriver::new(i2c, DEFAULT_ADDRESS);
/// oled.init().await?;
/// oled.draw(&DisplayState::new("Hello World", matrix, "A"), &DisplayConfig::default())?;
/// oled.flush().await?;
/// ```
pub struct OledDriver<I2C> {
    display: Display<I2C>,
    /// Set after a successful `init()`.
    initialized: bool,
}

impl<I2C> OledDriver<I2C>
where
    I2C: I2c,
{
    /// Construct an uninitialised driver.
    ///
    /// # Arguments
    /// * `i2c` — I2C peripheral (takes ownership for exclusive access).
    /// * `address` — 7-bit device address ([`DEFAULT_ADDRESS`] on the
    ///   keyboard module).
    pub fn new(i2c: I2C, address: u8) -> Self {
        let interface = I2CDisplayInterface::new_custom_address(i2c, address);
        let display = Ssd1306Async::new(interface, DisplaySize128x32, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();

        Self {
            display,
            initialized: false,
        }
    }

    /// Initialise the display controller.
    ///
    /// # Errors
    ///
    /// Returns [`OledError::InitializationFailed`] if the controller does
    /// not acknowledge the sequence.
    pub async fn init(&mut self) -> Result<(), OledError> {
        self.display
            .init()
            .await
            .map_err(|_| OledError::InitializationFailed)?;
        self.initialized = true;
        Ok(())
    }

    /// Clear the frame buffer and render `state` into it. No I2C traffic.
    ///
    /// # Errors
    ///
    /// Returns [`OledError::NotInitialized`] before [`init()`](Self::init).
    pub fn draw(&mut self, state: &DisplayState, config: &DisplayConfig) -> Result<(), OledError> {
        if !self.initialized {
            return Err(OledError::NotInitialized);
        }
        self.display.clear_buffer();
        render_display(&mut self.display, state, config)?;
        Ok(())
    }

    /// Transfer the frame buffer to the display.
    ///
    /// A full 512-byte frame takes roughly 10 ms at 400 kHz.
    ///
    /// # Errors
    ///
    /// Returns [`OledError::NotInitialized`] if [`init()`](Self::init) has
    /// not succeeded, or [`OledError::Display`] on a bus-level failure.
    pub async fn flush(&mut self) -> Result<(), OledError> {
        if !self.initialized {
            return Err(OledError::NotInitialized);
        }
        self.display.flush().await?;
        Ok(())
    }

    /// Whether [`init()`](Self::init) has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}
