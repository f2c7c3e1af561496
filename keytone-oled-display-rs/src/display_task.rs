//! Periodic display update task.
//!
//! [`display_update_task`] reads the shared [`KeyboardState`], renders the
//! title, key bitmap and note label, and flushes changed frames to the
//! panel.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Ticker};
use embedded_hal_async::i2c::I2c;

use keytone::keyboard::KeyboardState;

use crate::driver::OledDriver;
use crate::layout::{DisplayConfig, DisplayState};

/// Periodic display update loop.
///
/// This is a regular `async fn`, not an Embassy `#[task]`. Embassy tasks
/// cannot be generic, so wrap it in a concrete task:
///
/// ```ignore
/// #[embassy_executor::task]
/// async fn oled_task(
///     driver: OledDriver<MyConcreteI2cType>,
///     keyboard: &'static Mutex<CriticalSectionRawMutex, KeyboardState>,
///     config: DisplayConfig,
/// ) {
///     display_update_task(driver, keyboard, config).await;
/// }
/// ```
///
/// # Control flow
///
/// 1. Initialise the display hardware.
/// 2. Loop at `config.update_frequency_hz`:
///    - Lock `keyboard`, snapshot it into a [`DisplayState`] and note
///      `changed_oled`. Release the mutex.
///    - Skip if the state matches the last flushed frame.
///    - Render and flush (no mutex held).
///    - Lock `keyboard` and clear `changed_oled`, unless a scan during the
///      flush produced a different frame.
///
/// # Errors
///
/// * Initialisation failure: logs the error and **returns** (task exits).
/// * Render / flush failure: logs the error and retries next cycle.
pub async fn display_update_task<I2C>(
    mut driver: OledDriver<I2C>,
    keyboard: &'static Mutex<CriticalSectionRawMutex, KeyboardState>,
    config: DisplayConfig,
) where
    I2C: I2c,
{
    if let Err(_e) = driver.init().await {
        #[cfg(feature = "defmt")]
        defmt::error!("OLED init failed: {}", _e);
        return;
    }

    #[cfg(feature = "defmt")]
    defmt::info!("OLED initialised");

    let mut ticker = Ticker::every(Duration::from_millis(config.update_period_ms()));
    // Forces the first frame out even when nothing is pressed.
    let mut last_state: Option<DisplayState> = None;

    loop {
        ticker.next().await;

        let new_state = {
            let keyboard = keyboard.lock().await;
            DisplayState::from_keyboard(config.title, &keyboard)
        };

        if last_state == Some(new_state) {
            continue;
        }

        if let Err(_e) = driver.draw(&new_state, &config) {
            #[cfg(feature = "defmt")]
            defmt::error!("Render failed: {}", _e);
            continue;
        }

        if let Err(_e) = driver.flush().await {
            #[cfg(feature = "defmt")]
            defmt::error!("Flush failed: {}", _e);
            continue;
        }

        {
            let mut keyboard = keyboard.lock().await;
            if DisplayState::from_keyboard(config.title, &keyboard) == new_state {
                keyboard.take_oled_change();
            }
        }

        last_state = Some(new_state);
    }
}
