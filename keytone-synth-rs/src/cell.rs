//! Lock-free handoff of the current phase increment.

use core::sync::atomic::{AtomicU32, Ordering};

/// The phase increment currently in effect.
///
/// Single producer (the key scan task, once per scan cycle) and single
/// consumer (the sample routine, once per sample tick). Only the latest
/// value matters, so the cell is one atomic word with relaxed loads and
/// stores: a reader always sees a complete value from some earlier store,
/// never a torn one, and never waits.
///
/// Holds `0` (silence) or exactly one entry of the
/// [`IncrementTable`](crate::tuning::IncrementTable).
///
/// ```
/// use keytone::IncrementCell;
///
/// static CURRENT_INCREMENT: IncrementCell = IncrementCell::new();
///
/// CURRENT_INCREMENT.store(85_899_345);
/// assert_eq!(CURRENT_INCREMENT.load(), 85_899_345);
/// ```
#[derive(Debug, Default)]
pub struct IncrementCell {
    increment: AtomicU32,
}

impl IncrementCell {
    /// A cell holding `0` (no note).
    pub const fn new() -> Self {
        Self {
            increment: AtomicU32::new(0),
        }
    }

    /// Publish a new increment. Called by the scanner only.
    #[inline]
    pub fn store(&self, increment: u32) {
        self.increment.store(increment, Ordering::Relaxed);
    }

    /// Snapshot the current increment. Called by the oscillator only.
    #[inline]
    pub fn load(&self) -> u32 {
        self.increment.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::tuning::{IncrementTable, TuningConfig};
    use crate::Oscillator;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn new_cell_is_silent() {
        assert_eq!(IncrementCell::new().load(), 0);
        assert_eq!(IncrementCell::default().load(), 0);
    }

    #[test]
    fn last_store_wins() {
        let cell = IncrementCell::new();
        cell.store(1);
        cell.store(2);
        cell.store(3);
        assert_eq!(cell.load(), 3);
    }

    #[test]
    fn full_width_values_round_trip() {
        let cell = IncrementCell::new();
        cell.store(u32::MAX);
        assert_eq!(cell.load(), u32::MAX);
        cell.store(0);
        assert_eq!(cell.load(), 0);
    }

    #[test]
    fn concurrent_reader_only_sees_written_values() {
        const SCAN_CYCLES: usize = 50;
        const SAMPLE_TICKS: usize = 10_000;

        let table = IncrementTable::new(&TuningConfig::default()).unwrap();
        let cell = Arc::new(IncrementCell::new());
        let done = Arc::new(AtomicBool::new(false));

        let writer = {
            let cell = Arc::clone(&cell);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                for cycle in 0..SCAN_CYCLES {
                    // Alternate between notes and silence, like a player
                    // pressing and releasing keys.
                    let value = if cycle % 3 == 0 {
                        0
                    } else {
                        table.as_array()[cycle % 12]
                    };
                    cell.store(value);
                    thread::yield_now();
                }
                done.store(true, Ordering::Release);
            })
        };

        let reader = {
            let cell = Arc::clone(&cell);
            thread::spawn(move || {
                let mut osc = Oscillator::new();
                let mut ticks = 0;
                while ticks < SAMPLE_TICKS {
                    let seen = cell.load();
                    assert!(seen == 0 || table.contains(seen), "torn value {}", seen);
                    osc.advance(seen);
                    ticks += 1;
                }
                ticks
            })
        };

        writer.join().unwrap();
        assert_eq!(reader.join().unwrap(), SAMPLE_TICKS);
        assert!(done.load(Ordering::Acquire));

        let last = cell.load();
        assert!(last == 0 || table.contains(last));
    }
}
