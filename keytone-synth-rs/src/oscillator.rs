//! Phase-accumulator sawtooth oscillator.

use crate::cell::IncrementCell;
use crate::tuning::ACCUMULATOR_BITS;

/// Mid-point of the unsigned 8-bit sample range (the zero level).
pub const SAMPLE_MIDPOINT: i32 = 128;

/// Number of bits kept from the accumulator for each output sample.
const SAMPLE_BITS: u32 = 8;

/// Destination for one audio sample per sample period.
///
/// Implementations must not block: the oscillator calls this from the
/// highest-priority context. A PWM compare register, a DAC data register or
/// a test buffer are typical sinks.
pub trait AudioSink {
    /// Output one unsigned 8-bit sample (128 is the zero level).
    fn write_sample(&mut self, sample: u8);
}

/// Single-voice DDS oscillator.
///
/// Owns the 32-bit phase accumulator. Each tick adds the current increment
/// with wrap-around and derives the sample from the top 8 bits, giving a
/// sawtooth at `increment * sample_rate / 2^32` Hz. Integer arithmetic only,
/// so every tick takes the same bounded time and is reproducible bit for
/// bit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Oscillator {
    phase: u32,
}

impl Oscillator {
    /// An oscillator with the accumulator at zero.
    pub const fn new() -> Self {
        Self { phase: 0 }
    }

    /// An oscillator starting at `phase`.
    pub const fn with_phase(phase: u32) -> Self {
        Self { phase }
    }

    /// Current accumulator value.
    pub fn phase(&self) -> u32 {
        self.phase
    }

    /// Advance the accumulator by `increment` and return the new sample.
    ///
    /// ```
    /// use keytone::Oscillator;
    ///
    /// let mut osc = Oscillator::new();
    /// // Half a wrap puts the top byte at 0x80.
    /// assert_eq!(osc.advance(0x8000_0000), 0x80);
    /// ```
    #[inline]
    pub fn advance(&mut self, increment: u32) -> u8 {
        self.phase = self.phase.wrapping_add(increment);
        self.sample()
    }

    /// Sample for the current phase without advancing.
    ///
    /// The top byte is centred around zero and then shifted back into the
    /// unsigned range the audio sink expects.
    #[inline]
    pub fn sample(&self) -> u8 {
        let top = (self.phase >> (ACCUMULATOR_BITS - SAMPLE_BITS)) as i32;
        let centred = top - SAMPLE_MIDPOINT;
        (centred + SAMPLE_MIDPOINT) as u8
    }

    /// One sample period: a single atomic load of the shared increment, one
    /// accumulator update and one write to `sink`.
    #[inline]
    pub fn tick<S: AudioSink>(&mut self, increment: &IncrementCell, sink: &mut S) {
        let sample = self.advance(increment.load());
        sink.write_sample(sample);
    }
}
