//! High-level interface for the multiplexed key matrix.
//!
//! [`KeyMatrixBoard`] wraps the row multiplexer with row validation, the
//! settle delay before column sampling, a full-matrix scan, and the output
//! latch used for board control bits.

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;
use keytone::keyboard::{RawMatrix, COLUMNS, ROWS};

use crate::driver::RowMux;
use crate::error::MatrixError;
use crate::mux::{ADDRESS_LINES, DISPLAY_ENABLE_BIT, DISPLAY_RESET_BIT, DISPLAY_RESET_HOLD_US};

/// High-level interface for the 3 × 4 key matrix and its output latch.
///
/// Generic over any `embedded-hal` 1.0 output and input pins (sharing one
/// error type) and an async delay source.
///
/// # Example
///
/// ```ignore
/// use key_matrix_driver::KeyMatrixBoard;
///
/// let mut board = KeyMatrixBoard::new([ra0, ra1, ra2], ren, out, [c0, c1, c2, c3], delay);
///
/// // Raw levels for all three rows; `false` means pressed.
/// let levels = board.scan().await?;
/// ```
pub struct KeyMatrixBoard<O, I, D> {
    mux: RowMux<O, D>,
    columns: [I; COLUMNS],
}

impl<O, I, D> KeyMatrixBoard<O, I, D>
where
    O: OutputPin,
    I: InputPin<Error = O::Error>,
    D: DelayNs,
{
    /// Create a new board interface.
    ///
    /// # Arguments
    /// * `row_address` — RA0, RA1, RA2 (least significant first)
    /// * `row_enable` — REN, gates the decoder and clocks the output latch
    /// * `latch_data` — OUT, data line for the output latch
    /// * `columns` — C0–C3 inputs (pulled up; low when a switch is pressed)
    /// * `delay` — async delay used for the settle and strobe timings
    pub fn new(
        row_address: [O; ADDRESS_LINES],
        row_enable: O,
        latch_data: O,
        columns: [I; COLUMNS],
        delay: D,
    ) -> Self {
        Self {
            mux: RowMux::new(row_address, row_enable, latch_data, delay),
            columns,
        }
    }

    // -----------------------------------------------------------------------
    // Matrix reads
    // -----------------------------------------------------------------------

    /// Select decoder output `row` (0–7) and leave it enabled.
    ///
    /// Only rows below [`ROWS`] carry note switches; the others are
    /// accepted so the matrix can grow without a driver change.
    ///
    /// # Errors
    /// * [`MatrixError::InvalidRow`] if `row >= 8`
    /// * [`MatrixError::Pin`] on GPIO failure
    pub async fn select_row(&mut self, row: u8) -> Result<(), MatrixError<O::Error>> {
        self.mux.select(row).await
    }

    /// Read the raw levels of the four column lines.
    ///
    /// `true` is high (open), `false` is low (pressed). No delay is applied;
    /// call after [`select_row`](Self::select_row) has settled, or use
    /// [`read_row`](Self::read_row).
    pub fn read_columns(&mut self) -> Result<[bool; COLUMNS], MatrixError<O::Error>> {
        let mut levels = [true; COLUMNS];
        for (level, pin) in levels.iter_mut().zip(self.columns.iter_mut()) {
            *level = pin.is_high()?;
        }
        Ok(levels)
    }

    /// Select `row`, wait for it to settle, then read the columns.
    pub async fn read_row(&mut self, row: u8) -> Result<[bool; COLUMNS], MatrixError<O::Error>> {
        self.mux.select(row).await?;
        self.mux.settle().await;
        self.read_columns()
    }

    /// Read every note row in order (row 0 first).
    ///
    /// # Errors
    /// Returns the first GPIO error encountered; no partial matrix is
    /// returned.
    pub async fn scan(&mut self) -> Result<RawMatrix, MatrixError<O::Error>> {
        let mut levels = [[true; COLUMNS]; ROWS];
        for (row, columns) in levels.iter_mut().enumerate() {
            *columns = self.read_row(row as u8).await?;
        }
        Ok(levels)
    }

    // -----------------------------------------------------------------------
    // Output latch
    // -----------------------------------------------------------------------

    /// Store `value` into output latch bit `bit` (0–7).
    ///
    /// # Errors
    /// * [`MatrixError::InvalidMuxBit`] if `bit >= 8`
    /// * [`MatrixError::Pin`] on GPIO failure
    pub async fn set_out_mux_bit(&mut self, bit: u8, value: bool) -> Result<(), MatrixError<O::Error>> {
        self.mux.latch(bit, value).await
    }

    /// Reset the display controller and switch on its supply.
    ///
    /// Asserts the (active-low) reset bit, holds it for
    /// [`DISPLAY_RESET_HOLD_US`], releases it, then sets the display enable
    /// bit. The controller itself is initialised afterwards by the display
    /// driver.
    pub async fn power_up_display(&mut self) -> Result<(), MatrixError<O::Error>> {
        self.mux.latch(DISPLAY_RESET_BIT, false).await?;
        self.mux.delay_us(DISPLAY_RESET_HOLD_US).await;
        self.mux.latch(DISPLAY_RESET_BIT, true).await?;
        self.mux.latch(DISPLAY_ENABLE_BIT, true).await
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use core::cell::RefCell;
    use core::convert::Infallible;
    use std::rc::Rc;
    use std::vec::Vec;

    use embassy_futures::block_on;
    use embedded_hal::digital::ErrorType;
    use keytone::keyboard::Scanner;
    use keytone::tuning::{IncrementTable, TuningConfig};

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Line {
        Ra0,
        Ra1,
        Ra2,
        Ren,
        Out,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Set(Line, bool),
        DelayNs(u32),
        Read(usize),
    }

    /// Simulated decoder, latch and switch matrix.
    struct Bus {
        levels: RawMatrix,
        address: u8,
        enabled: bool,
        out: bool,
        latch: u8,
        latched: Vec<(u8, bool)>,
        events: Vec<Event>,
    }

    type SharedBus = Rc<RefCell<Bus>>;

    struct SimOutput {
        line: Line,
        bus: SharedBus,
    }

    impl SimOutput {
        fn drive(&mut self, level: bool) {
            let mut bus = self.bus.borrow_mut();
            bus.events.push(Event::Set(self.line, level));
            let mask = match self.line {
                Line::Ra0 => 0b001,
                Line::Ra1 => 0b010,
                Line::Ra2 => 0b100,
                Line::Ren => {
                    if level && !bus.enabled {
                        let (address, out) = (bus.address, bus.out);
                        if out {
                            bus.latch |= 1 << address;
                        } else {
                            bus.latch &= !(1 << address);
                        }
                        bus.latched.push((address, out));
                    }
                    bus.enabled = level;
                    return;
                }
                Line::Out => {
                    bus.out = level;
                    return;
                }
            };
            if level {
                bus.address |= mask;
            } else {
                bus.address &= !mask;
            }
        }
    }

    impl ErrorType for SimOutput {
        type Error = Infallible;
    }

    impl OutputPin for SimOutput {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.drive(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.drive(true);
            Ok(())
        }
    }

    struct SimColumn {
        column: usize,
        bus: SharedBus,
    }

    impl ErrorType for SimColumn {
        type Error = Infallible;
    }

    impl InputPin for SimColumn {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            let mut bus = self.bus.borrow_mut();
            bus.events.push(Event::Read(self.column));
            let row = bus.address as usize;
            Ok(if bus.enabled && row < ROWS {
                bus.levels[row][self.column]
            } else {
                true
            })
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            self.is_high().map(|high| !high)
        }
    }

    struct SimDelay {
        bus: SharedBus,
    }

    impl DelayNs for SimDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.bus.borrow_mut().events.push(Event::DelayNs(ns));
        }
    }

    type SimBoard = KeyMatrixBoard<SimOutput, SimColumn, SimDelay>;

    fn board(levels: RawMatrix) -> (SimBoard, SharedBus) {
        let bus = Rc::new(RefCell::new(Bus {
            levels,
            address: 0,
            enabled: false,
            out: false,
            latch: 0,
            latched: Vec::new(),
            events: Vec::new(),
        }));
        let out = |line| SimOutput {
            line,
            bus: Rc::clone(&bus),
        };
        let col = |column| SimColumn {
            column,
            bus: Rc::clone(&bus),
        };
        let board = KeyMatrixBoard::new(
            [out(Line::Ra0), out(Line::Ra1), out(Line::Ra2)],
            out(Line::Ren),
            out(Line::Out),
            [col(0), col(1), col(2), col(3)],
            SimDelay {
                bus: Rc::clone(&bus),
            },
        );
        (board, bus)
    }

    const OPEN: RawMatrix = [[true; COLUMNS]; ROWS];

    #[test]
    fn select_row_sequence() {
        let (mut b, bus) = board(OPEN);
        block_on(b.select_row(5)).unwrap();

        let bus = bus.borrow();
        assert_eq!(
            bus.events,
            [
                Event::Set(Line::Ren, false),
                Event::DelayNs(3_000),
                Event::Set(Line::Ra0, true),
                Event::Set(Line::Ra1, false),
                Event::Set(Line::Ra2, true),
                Event::Set(Line::Ren, true),
            ]
        );
        assert_eq!(bus.address, 5);
        assert!(bus.enabled);
    }

    #[test]
    fn select_row_out_of_range() {
        let (mut b, bus) = board(OPEN);
        assert_eq!(block_on(b.select_row(8)), Err(MatrixError::InvalidRow));
        assert!(bus.borrow().events.is_empty());
    }

    #[test]
    fn read_row_waits_for_settle_before_sampling() {
        let (mut b, bus) = board(OPEN);
        block_on(b.read_row(1)).unwrap();

        let events = &bus.borrow().events;
        let enable = events
            .iter()
            .position(|e| *e == Event::Set(Line::Ren, true))
            .unwrap();
        assert_eq!(events[enable + 1], Event::DelayNs(3_000));
        assert_eq!(
            &events[enable + 2..],
            &[Event::Read(0), Event::Read(1), Event::Read(2), Event::Read(3)]
        );
    }

    #[test]
    fn scan_reads_each_row() {
        let mut levels = OPEN;
        levels[0][2] = false;
        levels[2][1] = false;
        let (mut b, _) = board(levels);

        assert_eq!(block_on(b.scan()).unwrap(), levels);
    }

    #[test]
    fn scan_with_nothing_pressed_is_all_high() {
        let (mut b, _) = board(OPEN);
        assert_eq!(block_on(b.scan()).unwrap(), OPEN);
    }

    #[test]
    fn scan_feeds_scanner() {
        let mut levels = OPEN;
        levels[2][1] = false; // A
        let (mut b, _) = board(levels);
        let scanner = Scanner::new(IncrementTable::new(&TuningConfig::default()).unwrap());

        let result = scanner.decode(&block_on(b.scan()).unwrap());
        assert_eq!(result.label(), "A");
        assert_eq!(result.matrix.bits(), 1 << 9);
    }

    #[test]
    fn read_columns_when_unselected_is_open() {
        let (mut b, _) = board([[false; COLUMNS]; ROWS]);
        assert_eq!(b.read_columns().unwrap(), [true; COLUMNS]);
    }

    #[test]
    fn set_out_mux_bit_latches_and_releases_enable() {
        let (mut b, bus) = board(OPEN);
        block_on(b.set_out_mux_bit(DISPLAY_RESET_BIT, true)).unwrap();

        let bus = bus.borrow();
        assert_eq!(bus.latch, 1 << DISPLAY_RESET_BIT);
        assert!(!bus.enabled);
        assert!(bus.events.contains(&Event::DelayNs(2_000)));
        assert_eq!(bus.events.last(), Some(&Event::Set(Line::Ren, false)));
    }

    #[test]
    fn set_out_mux_bit_out_of_range() {
        let (mut b, _) = board(OPEN);
        assert_eq!(
            block_on(b.set_out_mux_bit(8, true)),
            Err(MatrixError::InvalidMuxBit)
        );
    }

    #[test]
    fn power_up_display_sequence() {
        let (mut b, bus) = board(OPEN);
        block_on(b.power_up_display()).unwrap();

        let bus = bus.borrow();
        assert_eq!(
            bus.latched,
            [
                (DISPLAY_RESET_BIT, false),
                (DISPLAY_RESET_BIT, true),
                (DISPLAY_ENABLE_BIT, true),
            ]
        );
        assert_eq!(bus.latch, (1 << DISPLAY_RESET_BIT) | (1 << DISPLAY_ENABLE_BIT));
    }
}
