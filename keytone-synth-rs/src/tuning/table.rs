use super::config::TuningConfig;
use super::error::TuningError;
use super::SEMITONES;
use crate::keyboard::SemitoneSlot;

/// `2^32` as a float, the number of accumulator units in one full wrap.
const ACCUMULATOR_SCALE: f64 = 4_294_967_296.0;

/// Immutable table of twelve 32-bit phase increments, one per semitone slot.
///
/// Built once at startup by [`IncrementTable::new()`]; the table is `Copy`
/// so the scan task can own its own copy without sharing.
///
/// **Invariant:** increments are strictly increasing with the slot index
/// and every increment is below `2^31` (the note is under Nyquist).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IncrementTable {
    increments: [u32; SEMITONES],
}

impl IncrementTable {
    /// Compute the table for `config`.
    ///
    /// Each slot gets its own frequency from
    /// [`TuningConfig::slot_frequency_hz()`], then
    /// `increment = floor(freq * 2^32 / sample_rate)`.
    ///
    /// # Errors
    ///
    /// * [`TuningError::ZeroSampleRate`] if `sample_rate_hz == 0`.
    /// * [`TuningError::InvalidReferenceSlot`] if `reference_slot >= 12`.
    /// * [`TuningError::InvalidReferenceFrequency`] if the reference is not a
    ///   positive finite number, or is so low that the increments are not
    ///   nonzero and strictly increasing.
    /// * [`TuningError::AboveNyquist`] if any slot reaches `sample_rate / 2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use keytone::tuning::{IncrementTable, TuningConfig};
    ///
    /// let table = IncrementTable::new(&TuningConfig::default()).unwrap();
    /// // A4 at 22 kHz: floor(440 * 2^32 / 22000)
    /// assert_eq!(table.get(9), Some(85_899_345));
    /// ```
    pub fn new(config: &TuningConfig) -> Result<Self, TuningError> {
        if config.sample_rate_hz == 0 {
            return Err(TuningError::ZeroSampleRate);
        }
        if config.reference_slot >= SEMITONES {
            return Err(TuningError::InvalidReferenceSlot);
        }
        if !config.reference_freq_hz.is_finite() || config.reference_freq_hz <= 0.0 {
            return Err(TuningError::InvalidReferenceFrequency);
        }

        let sample_rate = config.sample_rate_hz as f64;
        let nyquist = config.nyquist_hz();
        let mut increments = [0u32; SEMITONES];

        for (slot, increment) in increments.iter_mut().enumerate() {
            let freq = config.slot_frequency_hz(slot);
            if freq >= nyquist {
                return Err(TuningError::AboveNyquist);
            }
            *increment = libm::floor(freq * ACCUMULATOR_SCALE / sample_rate) as u32;
        }

        // A reference so low that slots round down to 0 (silence) or to
        // equal steps cannot be told apart from the rest of the table.
        if increments[0] == 0 || increments.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(TuningError::InvalidReferenceFrequency);
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("Increment table: {}", increments);

        Ok(Self { increments })
    }

    /// Increment for a validated slot.
    #[inline]
    pub fn increment(&self, slot: SemitoneSlot) -> u32 {
        self.increments[slot.index()]
    }

    /// Increment for `slot` (0–11), or `None` if out of bounds.
    pub fn get(&self, slot: usize) -> Option<u32> {
        self.increments.get(slot).copied()
    }

    /// The whole table, indexed by slot.
    pub fn as_array(&self) -> &[u32; SEMITONES] {
        &self.increments
    }

    /// Iterate over the increments in slot order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.increments.iter().copied()
    }

    /// Frequency in Hz that `slot` was derived from under `config`.
    ///
    /// Used for logging; the table itself stores only the increments.
    pub fn frequency_hz(config: &TuningConfig, slot: SemitoneSlot) -> f64 {
        config.slot_frequency_hz(slot.index())
    }

    /// Returns `true` if `increment` is one of the table entries.
    pub fn contains(&self, increment: u32) -> bool {
        self.increments.contains(&increment)
    }
}
