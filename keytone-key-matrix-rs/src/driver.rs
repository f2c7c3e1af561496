//! Low-level row multiplexer driver.
//!
//! Owns the address lines, the row-enable line and the latch data line, and
//! implements the two bus operations: selecting a decoder output and
//! clocking one bit into the output latch. Timing delays are awaited on the
//! supplied [`DelayNs`] so the scan task yields instead of spinning.
//!
//! This module is crate-private — consumers interact with
//! [`KeyMatrixBoard`](crate::KeyMatrixBoard) instead.

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal_async::delay::DelayNs;

use crate::error::MatrixError;
use crate::mux::{ADDRESS_COUNT, ADDRESS_LINES, LATCH_PULSE_US, ROW_DISABLE_DELAY_US, SETTLE_DELAY_US};

/// Low-level 3-to-8 decoder and output latch driver.
pub(crate) struct RowMux<O, D> {
    /// RA0, RA1, RA2 (least significant first).
    address: [O; ADDRESS_LINES],
    /// REN: gates the decoder outputs and clocks the latch.
    enable: O,
    /// OUT: level stored into the latch on an enable pulse.
    data: O,
    delay: D,
}

impl<O, D> RowMux<O, D>
where
    O: OutputPin,
    D: DelayNs,
{
    pub fn new(address: [O; ADDRESS_LINES], enable: O, data: O, delay: D) -> Self {
        Self {
            address,
            enable,
            data,
            delay,
        }
    }

    // -----------------------------------------------------------------------
    // Bus operations
    // -----------------------------------------------------------------------

    /// Route the decoder to `address` and leave it enabled.
    ///
    /// 1. Drive REN low (all decoder outputs inactive).
    /// 2. Wait [`ROW_DISABLE_DELAY_US`].
    /// 3. Write the address lines.
    /// 4. Drive REN high.
    ///
    /// The caller must wait [`settle()`](Self::settle) before sampling
    /// anything the selected output drives.
    pub async fn select(&mut self, address: u8) -> Result<(), MatrixError<O::Error>> {
        if address >= ADDRESS_COUNT {
            return Err(MatrixError::InvalidRow);
        }

        self.enable.set_low()?;
        self.delay.delay_us(ROW_DISABLE_DELAY_US).await;
        self.write_address(address)?;
        self.enable.set_high()?;

        Ok(())
    }

    /// Store `value` into latch bit `bit`.
    ///
    /// Sets up address and data with REN low, then pulses REN high for
    /// [`LATCH_PULSE_US`] and leaves it low.
    pub async fn latch(&mut self, bit: u8, value: bool) -> Result<(), MatrixError<O::Error>> {
        if bit >= ADDRESS_COUNT {
            return Err(MatrixError::InvalidMuxBit);
        }

        self.enable.set_low()?;
        self.write_address(bit)?;
        self.data.set_state(PinState::from(value))?;
        self.enable.set_high()?;
        self.delay.delay_us(LATCH_PULSE_US).await;
        self.enable.set_low()?;

        Ok(())
    }

    /// Wait for a freshly selected row to settle.
    pub async fn settle(&mut self) {
        self.delay.delay_us(SETTLE_DELAY_US).await;
    }

    /// Wait an arbitrary number of microseconds on the bus delay source.
    pub async fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us).await;
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn write_address(&mut self, address: u8) -> Result<(), O::Error> {
        for (bit, line) in self.address.iter_mut().enumerate() {
            line.set_state(PinState::from(address & (1 << bit) != 0))?;
        }
        Ok(())
    }
}
