/// Timing configuration for the key scan task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanConfig {
    /// Scan rate in Hz. Default: 20 (one scan every 50 ms).
    pub scan_frequency_hz: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            scan_frequency_hz: 20,
        }
    }
}

impl ScanConfig {
    /// Convert the configured frequency to a scan period in milliseconds.
    ///
    /// Formula: `1000 / scan_frequency_hz`, with 0 Hz treated as 1 Hz.
    pub fn scan_period_ms(&self) -> u64 {
        1000 / (self.scan_frequency_hz as u64).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_20hz() {
        let c = ScanConfig::default();
        assert_eq!(c.scan_frequency_hz, 20);
        assert_eq!(c.scan_period_ms(), 50);
    }

    #[test]
    fn scan_period_100hz() {
        let c = ScanConfig {
            scan_frequency_hz: 100,
        };
        assert_eq!(c.scan_period_ms(), 10);
    }

    #[test]
    fn zero_frequency_falls_back_to_one_second() {
        let c = ScanConfig {
            scan_frequency_hz: 0,
        };
        assert_eq!(c.scan_period_ms(), 1000);
    }
}
