//! Key matrix decoding and note resolution.
//!
//! The keyboard is a 3 × 4 switch matrix. Each row is selected in turn and
//! its four column lines are read; a line reading electrically low means the
//! switch is pressed.
//!
//! ```text
//!            col 0   col 1   col 2   col 3
//! row 0:     C       C#      D       D#
//! row 1:     E       F       F#      G
//! row 2:     G#      A       A#      B
//! ```
//!
//! The switch at (row, column) is semitone slot `4 * row + column`, which is
//! also its bit position in [`SwitchMatrixState`].
//!
//! # Tie-break
//!
//! When several switches are held, the last one encountered in scan order
//! (rows ascending, then columns ascending) wins. The policy is arbitrary
//! but kept stable so the sounding note and the displayed label agree with
//! earlier firmware.

mod config;
mod matrix;
mod scanner;
mod slot;
mod state;

pub use config::ScanConfig;
pub use matrix::{RawMatrix, SwitchMatrixState};
pub use scanner::{ActiveNote, ScanResult, Scanner};
pub use slot::SemitoneSlot;
pub use state::KeyboardState;

use crate::tuning::SEMITONES;

/// Number of rows that carry note switches.
pub const ROWS: usize = 3;

/// Number of column input lines.
pub const COLUMNS: usize = 4;

/// Number of note switches in the matrix.
pub const KEY_COUNT: usize = ROWS * COLUMNS;

/// Display names indexed by semitone slot.
pub const NOTE_NAMES: [&str; SEMITONES] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

const _: () = assert!(KEY_COUNT == SEMITONES);
