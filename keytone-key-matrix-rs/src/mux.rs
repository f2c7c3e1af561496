//! Address, latch-bit and timing constants for the row multiplexer.
//!
//! Three address lines (RA0–RA2) select one of eight outputs of a 3-to-8
//! decoder that is gated by the row-enable line (REN). Outputs 0–2 drive the
//! key matrix rows. The same decoder also clocks an output latch: with REN
//! pulsed high, the level on the OUT line is stored in the latch bit given
//! by the address.

// ---------------------------------------------------------------------------
// Address space
// ---------------------------------------------------------------------------

/// Number of row address lines.
pub const ADDRESS_LINES: usize = 3;

/// Number of addressable decoder outputs (`2^ADDRESS_LINES`).
pub const ADDRESS_COUNT: u8 = 1 << ADDRESS_LINES;

// ---------------------------------------------------------------------------
// Output latch bits
// ---------------------------------------------------------------------------

/// Display power enable (active high).
pub const DISPLAY_ENABLE_BIT: u8 = 3;

/// Display logic reset (active low).
pub const DISPLAY_RESET_BIT: u8 = 4;

/// West handshake output, for chaining boards.
pub const HANDSHAKE_WEST_BIT: u8 = 5;

/// East handshake output, for chaining boards.
pub const HANDSHAKE_EAST_BIT: u8 = 6;

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Delay in microseconds between disabling the decoder and changing the
/// address, so no other output glitches while the lines move.
pub const ROW_DISABLE_DELAY_US: u32 = 3;

/// Delay in microseconds after selecting a row before the column lines are
/// sampled. Must exceed the decoder propagation and line settle time.
pub const SETTLE_DELAY_US: u32 = 3;

/// Width in microseconds of the REN pulse that clocks the output latch.
pub const LATCH_PULSE_US: u32 = 2;

/// Time in microseconds the display reset is held asserted during power-up.
pub const DISPLAY_RESET_HOLD_US: u32 = 2;
