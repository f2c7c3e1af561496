use super::slot::SemitoneSlot;
use super::{COLUMNS, KEY_COUNT, ROWS};

/// Raw electrical levels of one full scan, `levels[row][column]`.
///
/// `true` is a high line (switch open), `false` a low line (switch
/// pressed). This is what the matrix driver reads;
/// [`Scanner::decode`](super::Scanner::decode) inverts it.
pub type RawMatrix = [[bool; COLUMNS]; ROWS];

/// Which switches were pressed during one scan.
///
/// Bit `4 * row + column` is set when that switch is pressed. A fresh value
/// is built every scan; the previous one is replaced, never merged.
///
/// ```
/// use keytone::keyboard::{SemitoneSlot, SwitchMatrixState};
///
/// let mut state = SwitchMatrixState::empty();
/// state.press(SemitoneSlot::new(9).unwrap());
/// assert_eq!(state.bits(), 1 << 9);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchMatrixState(u32);

impl SwitchMatrixState {
    /// Mask of the bits that correspond to real switches.
    pub const MASK: u32 = (1 << KEY_COUNT) - 1;

    /// No switch pressed.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build from a bit pattern; bits above the matrix size are dropped.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & Self::MASK)
    }

    /// The bit pattern, one bit per switch.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Mark `slot` as pressed.
    pub fn press(&mut self, slot: SemitoneSlot) {
        self.0 |= 1 << slot.index();
    }

    /// Returns `true` if the switch for `slot` is pressed.
    pub const fn is_pressed(self, slot: SemitoneSlot) -> bool {
        self.0 & (1 << slot.index()) != 0
    }

    /// Returns `true` if no switch is pressed.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of pressed switches.
    pub const fn pressed_count(self) -> u32 {
        self.0.count_ones()
    }

    /// Pressed slots in scan order.
    pub fn pressed(self) -> impl Iterator<Item = SemitoneSlot> {
        SemitoneSlot::all().filter(move |&slot| self.is_pressed(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(i: usize) -> SemitoneSlot {
        SemitoneSlot::new(i).unwrap()
    }

    #[test]
    fn empty_has_no_pressed_slots() {
        let state = SwitchMatrixState::empty();
        assert!(state.is_empty());
        assert_eq!(state.bits(), 0);
        assert_eq!(state.pressed().count(), 0);
    }

    #[test]
    fn press_sets_its_bit() {
        let mut state = SwitchMatrixState::empty();
        state.press(slot(9));
        assert_eq!(state.bits(), 1 << 9);
        assert!(state.is_pressed(slot(9)));
        assert!(!state.is_pressed(slot(8)));
        assert_eq!(state.pressed_count(), 1);
    }

    #[test]
    fn pressing_every_slot_fills_the_mask() {
        let mut state = SwitchMatrixState::empty();
        for s in SemitoneSlot::all() {
            state.press(s);
        }
        assert_eq!(state.bits(), SwitchMatrixState::MASK);
        assert_eq!(state.pressed_count(), 12);
    }

    #[test]
    fn from_bits_masks_unused_positions() {
        let state = SwitchMatrixState::from_bits(0xFFFF_0004);
        assert_eq!(state.bits(), 0x0004);
    }

    #[test]
    fn pressed_iterates_in_scan_order() {
        let mut state = SwitchMatrixState::empty();
        state.press(slot(9));
        state.press(slot(2));
        state.press(slot(11));
        let mut it = state.pressed();
        assert_eq!(it.next(), Some(slot(2)));
        assert_eq!(it.next(), Some(slot(9)));
        assert_eq!(it.next(), Some(slot(11)));
        assert_eq!(it.next(), None);
    }
}
