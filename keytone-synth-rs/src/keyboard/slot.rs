use super::{COLUMNS, NOTE_NAMES, ROWS};
use crate::tuning::SEMITONES;

/// One chromatic position within the octave (0 = C … 11 = B).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SemitoneSlot(u8);

impl SemitoneSlot {
    /// Returns `None` if `index >= 12`.
    pub const fn new(index: usize) -> Option<Self> {
        if index < SEMITONES {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Slot of the switch at (`row`, `column`), or `None` outside the matrix.
    pub const fn from_position(row: usize, column: usize) -> Option<Self> {
        if row < ROWS && column < COLUMNS {
            Self::new(row * COLUMNS + column)
        } else {
            None
        }
    }

    /// Index into the increment and name tables.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Human-readable note name, e.g. `"C#"`.
    pub const fn name(self) -> &'static str {
        NOTE_NAMES[self.0 as usize]
    }

    /// Iterate over all twelve slots in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..SEMITONES as u8).map(Self)
    }
}
