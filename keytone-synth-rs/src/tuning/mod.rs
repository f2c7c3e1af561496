//! Semitone-to-phase-increment table for direct digital synthesis.
//!
//! For a sample rate `R`, a reference frequency `F0` at slot `I0` and an
//! accumulator of [`ACCUMULATOR_BITS`] bits:
//!
//! ```text
//! freq(i)      = F0 * 2^((i - I0) / 12)
//! increment(i) = floor(freq(i) * 2^32 / R)
//! ```
//!
//! One full accumulator wrap happens at exactly `freq(i)`. Every slot is
//! derived with its own exponentiation; the table is built once and then
//! only read.

mod config;
mod error;
mod table;

pub use config::TuningConfig;
pub use error::TuningError;
pub use table::IncrementTable;

/// Number of chromatic positions in one octave.
pub const SEMITONES: usize = 12;

/// Width of the oscillator phase accumulator in bits.
pub const ACCUMULATOR_BITS: u32 = u32::BITS;

/// Audio sample rate of the firmware, in Hz.
pub const SAMPLE_RATE_HZ: u32 = 22_000;

/// Frequency of the reference note (A4), in Hz.
pub const REFERENCE_FREQ_HZ: u32 = 440;

/// Slot of the reference note within the octave (A).
pub const REFERENCE_SLOT: usize = 9;

// The highest slot is less than one octave above the reference, so keeping
// one octave above the reference under Nyquist keeps every increment
// below 2^31.
const _: () = assert!(REFERENCE_FREQ_HZ * 2 < SAMPLE_RATE_HZ / 2);
const _: () = assert!(REFERENCE_SLOT < SEMITONES);
