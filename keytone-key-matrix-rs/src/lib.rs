//! Async driver for the multiplexed 3 × 4 key matrix.
//!
//! Twelve switches sit on three rows selected through a 3-to-8 decoder and
//! four pulled-up column inputs. The decoder also clocks an 8-bit output
//! latch that carries board control lines such as the display reset.
//!
//! # Architecture
//!
//! - **`driver`** (crate-private): address/enable sequencing and latch
//!   strobes, with the bus timings.
//! - **[`KeyMatrixBoard`]** (public): validated row selection, column
//!   reads, full scans and output latch writes.
//! - **[`key_scan_task`]** (feature `task`): the periodic loop that feeds
//!   the shared increment cell and keyboard snapshot, one [`scan_cycle`]
//!   per tick.
//!
//! # Quick start
//!
//! ```ignore
//! use key_matrix_driver::KeyMatrixBoard;
//!
//! let mut board = KeyMatrixBoard::new([ra0, ra1, ra2], ren, out, [c0, c1, c2, c3], delay);
//! board.power_up_display().await?;
//!
//! let levels = board.scan().await?;
//! let result = scanner.scan_and_publish(&levels, &CURRENT_INCREMENT);
//! ```
//!
//! # Features
//!
//! - **`defmt`**: [`defmt::Format`] on error types and scan logging.
//! - **`task`**: [`key_scan_task`], pulling in `embassy-sync` and
//!   `embassy-time`.

#![no_std]

pub use error::MatrixError;
pub use key_matrix::KeyMatrixBoard;
pub use mux::{
    ADDRESS_COUNT, DISPLAY_ENABLE_BIT, DISPLAY_RESET_BIT, HANDSHAKE_EAST_BIT, HANDSHAKE_WEST_BIT,
    SETTLE_DELAY_US,
};
#[cfg(feature = "task")]
pub use scan_task::{key_scan_task, scan_cycle};

mod driver;
mod error;
mod key_matrix;
mod mux;
#[cfg(any(feature = "task", test))]
#[cfg_attr(not(feature = "task"), allow(dead_code))]
mod scan_task;
