use super::matrix::{RawMatrix, SwitchMatrixState};
use super::slot::SemitoneSlot;
use crate::cell::IncrementCell;
use crate::tuning::IncrementTable;

/// The note selected by one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActiveNote {
    /// Winning switch.
    pub slot: SemitoneSlot,
    /// Display label, e.g. `"A"`.
    pub name: &'static str,
    /// Phase increment looked up from the [`IncrementTable`].
    pub increment: u32,
}

/// Outcome of decoding one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanResult {
    /// Every switch seen pressed during the scan.
    pub matrix: SwitchMatrixState,
    /// The winning note, `None` if nothing is pressed.
    pub active: Option<ActiveNote>,
}

impl ScanResult {
    /// Increment to publish: the active note's, or `0` for silence.
    pub fn increment(&self) -> u32 {
        self.active.map_or(0, |note| note.increment)
    }

    /// Label to display: the active note's name, or `""`.
    pub fn label(&self) -> &'static str {
        self.active.map_or("", |note| note.name)
    }
}

/// Turns raw matrix levels into a [`ScanResult`] and publishes the
/// increment.
///
/// Holds its own copy of the [`IncrementTable`]; decoding does no I/O and
/// can be tested without hardware.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Scanner {
    table: IncrementTable,
}

impl Scanner {
    /// Create a scanner that resolves notes against `table`.
    pub fn new(table: IncrementTable) -> Self {
        Self { table }
    }

    /// The table notes are resolved against.
    pub fn table(&self) -> &IncrementTable {
        &self.table
    }

    /// Decode one full scan.
    ///
    /// Walks rows in ascending order and columns in ascending order within
    /// each row. Every low line sets its bit; each pressed switch replaces
    /// the previous candidate, so the last one walked wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use keytone::keyboard::{Scanner, COLUMNS, ROWS};
    /// use keytone::tuning::{IncrementTable, TuningConfig};
    ///
    /// let scanner = Scanner::new(IncrementTable::new(&TuningConfig::default()).unwrap());
    /// let mut levels = [[true; COLUMNS]; ROWS];
    /// levels[0][2] = false; // D
    /// levels[2][1] = false; // A
    ///
    /// let result = scanner.decode(&levels);
    /// assert_eq!(result.label(), "A");
    /// assert_eq!(result.matrix.bits(), (1 << 2) | (1 << 9));
    /// ```
    pub fn decode(&self, levels: &RawMatrix) -> ScanResult {
        let mut matrix = SwitchMatrixState::empty();
        let mut candidate: Option<SemitoneSlot> = None;

        for (row, columns) in levels.iter().enumerate() {
            for (column, &level) in columns.iter().enumerate() {
                if level {
                    continue;
                }
                if let Some(slot) = SemitoneSlot::from_position(row, column) {
                    matrix.press(slot);
                    candidate = Some(slot);
                }
            }
        }

        ScanResult {
            matrix,
            active: candidate.map(|slot| self.resolve(slot)),
        }
    }

    /// Look up the increment and label for `slot`.
    pub fn resolve(&self, slot: SemitoneSlot) -> ActiveNote {
        ActiveNote {
            slot,
            name: slot.name(),
            increment: self.table.increment(slot),
        }
    }

    /// Store the result's increment into `cell` (one store per scan).
    pub fn publish(&self, result: &ScanResult, cell: &IncrementCell) {
        cell.store(result.increment());
    }

    /// [`decode`](Self::decode) then [`publish`](Self::publish).
    pub fn scan_and_publish(&self, levels: &RawMatrix, cell: &IncrementCell) -> ScanResult {
        let result = self.decode(levels);
        self.publish(&result, cell);
        result
    }
}
