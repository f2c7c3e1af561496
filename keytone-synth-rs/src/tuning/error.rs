/// Errors that can occur when building an [`IncrementTable`](super::IncrementTable)
/// from a custom [`TuningConfig`](super::TuningConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TuningError {
    /// The sample rate is zero.
    ZeroSampleRate,
    /// Reference slot is out of bounds (must be < SEMITONES).
    InvalidReferenceSlot,
    /// Reference frequency is not positive and finite, or too low to give
    /// distinct nonzero increments.
    InvalidReferenceFrequency,
    /// A slot frequency reaches half the sample rate.
    AboveNyquist,
}
