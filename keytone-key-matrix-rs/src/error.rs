//! Error types for the key matrix driver.

use core::fmt;

/// Errors that can occur when driving the key matrix or the output latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixError<E> {
    /// Underlying GPIO error.
    Pin(E),

    /// Row address out of range (must be 0–7).
    InvalidRow,

    /// Output latch bit out of range (must be 0–7).
    InvalidMuxBit,
}

// Allow ergonomic `?` propagation from raw pin errors.
impl<E> From<E> for MatrixError<E> {
    fn from(error: E) -> Self {
        MatrixError::Pin(error)
    }
}

impl<E: fmt::Debug> fmt::Display for MatrixError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MatrixError::Pin(e) => write!(f, "GPIO error: {:?}", e),
            MatrixError::InvalidRow => write!(f, "Invalid row address (must be 0-7)"),
            MatrixError::InvalidMuxBit => write!(f, "Invalid output latch bit (must be 0-7)"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: fmt::Debug> defmt::Format for MatrixError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            MatrixError::Pin(e) => defmt::write!(f, "GPIO error: {}", defmt::Debug2Format(e)),
            MatrixError::InvalidRow => defmt::write!(f, "Invalid row address"),
            MatrixError::InvalidMuxBit => defmt::write!(f, "Invalid output latch bit"),
        }
    }
}
