use super::{REFERENCE_FREQ_HZ, REFERENCE_SLOT, SAMPLE_RATE_HZ, SEMITONES};

/// Tuning parameters for [`IncrementTable::new()`](super::IncrementTable::new).
///
/// [`TuningConfig::default()`] reproduces the firmware constants: 22 kHz
/// sample rate, A = 440 Hz at slot 9.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TuningConfig {
    /// Rate at which the oscillator consumes increments, in Hz. Default: 22 000.
    pub sample_rate_hz: u32,
    /// Frequency of the reference note in Hz. Default: 440.0.
    pub reference_freq_hz: f64,
    /// Slot index of the reference note (0–11). Default: 9.
    pub reference_slot: usize,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: SAMPLE_RATE_HZ,
            reference_freq_hz: REFERENCE_FREQ_HZ as f64,
            reference_slot: REFERENCE_SLOT,
        }
    }
}

impl TuningConfig {
    /// Equal-tempered frequency of `slot` relative to the reference note.
    ///
    /// Formula: `reference_freq_hz * 2^((slot - reference_slot) / 12)`.
    pub fn slot_frequency_hz(&self, slot: usize) -> f64 {
        let semitones = slot as f64 - self.reference_slot as f64;
        self.reference_freq_hz * libm::pow(2.0, semitones / SEMITONES as f64)
    }

    /// Highest frequency the oscillator can represent (half the sample rate).
    pub fn nyquist_hz(&self) -> f64 {
        self.sample_rate_hz as f64 / 2.0
    }

    /// Length of one sample period on a `tick_hz` time base, in whole ticks.
    ///
    /// Truncates like `embassy_time::Duration::from_hz`; never less than 1.
    pub fn period_ticks(&self, tick_hz: u64) -> u64 {
        (tick_hz / (self.sample_rate_hz as u64).max(1)).max(1)
    }

    /// The same tuning retimed to the rate a `period_ticks` sample period
    /// on a `tick_hz` time base really runs at.
    ///
    /// The table must be built for the rate the oscillator is clocked at,
    /// not the rate that was asked for: at 1 MHz a 22 kHz request becomes
    /// a 45-tick period, i.e. 22 222 Hz.
    ///
    /// ```
    /// use keytone::tuning::TuningConfig;
    ///
    /// let config = TuningConfig::default();
    /// let clocked = config.clocked_by(1_000_000, config.period_ticks(1_000_000));
    /// assert_eq!(clocked.sample_rate_hz, 22_222);
    /// ```
    pub fn clocked_by(self, tick_hz: u64, period_ticks: u64) -> Self {
        let period_ticks = period_ticks.max(1);
        let rate = (tick_hz + period_ticks / 2) / period_ticks;
        Self {
            sample_rate_hz: rate.min(u32::MAX as u64) as u32,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let c = TuningConfig::default();
        assert_eq!(c.sample_rate_hz, 22_000);
        assert_eq!(c.reference_freq_hz, 440.0);
        assert_eq!(c.reference_slot, 9);
    }

    #[test]
    fn reference_slot_is_reference_frequency() {
        let c = TuningConfig::default();
        assert_eq!(c.slot_frequency_hz(9), 440.0);
    }

    #[test]
    fn middle_c_frequency() {
        let c = TuningConfig::default();
        let f = c.slot_frequency_hz(0);
        assert!((f - 261.625_565).abs() < 1e-5);
    }

    #[test]
    fn period_ticks_truncates() {
        let c = TuningConfig::default();
        assert_eq!(c.period_ticks(1_000_000), 45);
        assert_eq!(c.period_ticks(32_768), 1);
        assert_eq!(c.period_ticks(1_000), 1);
    }

    #[test]
    fn clocked_by_uses_the_real_period() {
        let c = TuningConfig::default();
        let clocked = c.clocked_by(1_000_000, 45);
        assert_eq!(clocked.sample_rate_hz, 22_222);
        assert_eq!(clocked.reference_freq_hz, c.reference_freq_hz);
        assert_eq!(clocked.reference_slot, c.reference_slot);
    }

    #[test]
    fn clocked_by_exact_period_is_unchanged() {
        let c = TuningConfig::default();
        assert_eq!(c.clocked_by(22_000_000, 1_000).sample_rate_hz, 22_000);
    }

    #[test]
    fn nyquist_is_half_the_sample_rate() {
        assert_eq!(TuningConfig::default().nyquist_hz(), 11_000.0);
    }
}
