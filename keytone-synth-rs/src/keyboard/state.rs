use super::matrix::SwitchMatrixState;
use super::scanner::{ActiveNote, ScanResult};

/// Latest keyboard snapshot, shared between the scan task (writer) and
/// the display task (reader).
///
/// The firmware keeps it behind an async mutex; neither side holds the
/// lock across I/O. The sample routine never touches it.
///
/// # Change Tracking
///
/// **`changed_oled`** is set by [`update()`](Self::update) whenever the
/// matrix or the active note differs from the previous scan, and cleared by
/// the display task after a successful flush.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardState {
    /// Switches pressed during the most recent scan.
    pub matrix: SwitchMatrixState,
    /// Note resolved by the most recent scan.
    pub active: Option<ActiveNote>,
    /// Number of completed scans (wraps).
    pub scan_count: u32,
    /// Flag indicating the OLED display needs to redraw.
    pub changed_oled: bool,
}

impl KeyboardState {
    /// Empty snapshot: nothing pressed, no scans yet.
    pub const fn new() -> Self {
        Self {
            matrix: SwitchMatrixState::empty(),
            active: None,
            scan_count: 0,
            changed_oled: false,
        }
    }

    /// Replace the snapshot with a fresh scan.
    ///
    /// Returns `true` if the matrix or the active note changed.
    pub fn update(&mut self, result: &ScanResult) -> bool {
        let changed = self.matrix != result.matrix || self.active != result.active;
        self.matrix = result.matrix;
        self.active = result.active;
        self.scan_count = self.scan_count.wrapping_add(1);
        if changed {
            self.changed_oled = true;
        }
        changed
    }

    /// Label of the active note, or `""`.
    pub fn label(&self) -> &'static str {
        self.active.map_or("", |note| note.name)
    }

    /// Read and clear the OLED change flag.
    pub fn take_oled_change(&mut self) -> bool {
        core::mem::take(&mut self.changed_oled)
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Scanner, COLUMNS, ROWS};
    use super::*;
    use crate::tuning::{IncrementTable, TuningConfig};

    fn scanner() -> Scanner {
        Scanner::new(IncrementTable::new(&TuningConfig::default()).unwrap())
    }

    #[test]
    fn new_state_is_empty() {
        let state = KeyboardState::new();
        assert!(state.matrix.is_empty());
        assert!(state.active.is_none());
        assert_eq!(state.label(), "");
        assert_eq!(state.scan_count, 0);
        assert!(!state.changed_oled);
    }

    #[test]
    fn update_sets_changed_oled() {
        let s = scanner();
        let mut levels = [[true; COLUMNS]; ROWS];
        levels[2][1] = false;

        let mut state = KeyboardState::new();
        assert!(state.update(&s.decode(&levels)));
        assert!(state.changed_oled);
        assert_eq!(state.label(), "A");
        assert_eq!(state.matrix.bits(), 1 << 9);
        assert_eq!(state.scan_count, 1);
    }

    #[test]
    fn identical_scan_does_not_mark_change() {
        let s = scanner();
        let levels = [[true; COLUMNS]; ROWS];

        let mut state = KeyboardState::new();
        assert!(!state.update(&s.decode(&levels)));
        assert!(!state.changed_oled);
        assert_eq!(state.scan_count, 1);
    }

    #[test]
    fn take_oled_change_clears_flag() {
        let s = scanner();
        let mut levels = [[true; COLUMNS]; ROWS];
        levels[0][0] = false;

        let mut state = KeyboardState::new();
        state.update(&s.decode(&levels));
        assert!(state.take_oled_change());
        assert!(!state.take_oled_change());
    }

    #[test]
    fn flag_survives_until_taken() {
        let s = scanner();
        let mut pressed = [[true; COLUMNS]; ROWS];
        pressed[0][0] = false;
        let open = [[true; COLUMNS]; ROWS];

        let mut state = KeyboardState::new();
        state.update(&s.decode(&pressed));
        // A later scan with no difference must not clear the pending redraw.
        state.update(&s.decode(&pressed));
        assert!(state.changed_oled);

        state.take_oled_change();
        state.update(&s.decode(&open));
        assert!(state.changed_oled);
        assert_eq!(state.label(), "");
    }
}
