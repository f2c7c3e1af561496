//! Async OLED display driver for the keyboard's 128×32 panel using Embassy.
//!
//! This crate provides [`OledDriver`], a wrapper around the [`ssd1306`]
//! crate in async buffered-graphics mode, the [`DisplayState`] snapshot
//! and renderer, and [`display_update_task`], a periodic loop that shows
//! the pressed keys and the active note.
//!
//! # Quick Start
//!
//! ```ignore
//! use keytone_oled_display_rs::{display_update_task, DisplayConfig, OledDriver, DEFAULT_ADDRESS};
//!
//! let oled = OledDriver::new(i2c, DEFAULT_ADDRESS);
//! spawner.spawn(unwrap!(oled_task(oled, keyboard, DisplayConfig::default())));
//!
//! // Thin task wrapper (Embassy tasks cannot be generic):
//! #[embassy_executor::task]
//! async fn oled_task(
//!     driver: OledDriver<MyI2cType>,
//!     keyboard: &'static Mutex<CriticalSectionRawMutex, KeyboardState>,
//!     config: DisplayConfig,
//! ) {
//!     display_update_task(driver, keyboard, config).await;
//! }
//! ```
//!
//! # Crate Features
//!
//! - **`defmt`**: structured logging via [`defmt`].
//! - **`task`**: [`display_update_task`], pulling in `embassy-sync` and
//!   `embassy-time`.

#![no_std]

#[cfg(feature = "task")]
pub mod display_task;
pub mod driver;
pub mod error;
pub mod layout;

#[cfg(feature = "task")]
pub use display_task::display_update_task;
pub use driver::{OledDriver, DEFAULT_ADDRESS};
pub use error::OledError;
pub use layout::{format_matrix, render_display, DisplayConfig, DisplayState};
