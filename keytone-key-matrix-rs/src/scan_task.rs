//! Periodic key scan loop.
//!
//! Reads the matrix at the configured rate, decodes the winning note,
//! publishes its increment to the shared [`IncrementCell`] and refreshes
//! the [`KeyboardState`] snapshot the display reads.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
#[cfg(feature = "task")]
use embassy_time::{Duration, Ticker};
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;

#[cfg(feature = "task")]
use keytone::keyboard::ScanConfig;
use keytone::keyboard::{KeyboardState, ScanResult, Scanner};
use keytone::IncrementCell;

use crate::error::MatrixError;
use crate::key_matrix::KeyMatrixBoard;

/// One scan period's work.
///
/// 1. Scan all rows.
/// 2. Decode and store the increment into `cell`. This is the only store
///    of the cycle.
/// 3. Lock `keyboard`, update the snapshot, release.
///
/// # Errors
///
/// A GPIO error aborts the cycle before step 2: the cell keeps its previous
/// value and the snapshot (including `scan_count`) is left untouched.
pub async fn scan_cycle<O, I, D>(
    board: &mut KeyMatrixBoard<O, I, D>,
    scanner: &Scanner,
    cell: &IncrementCell,
    keyboard: &Mutex<CriticalSectionRawMutex, KeyboardState>,
) -> Result<ScanResult, MatrixError<O::Error>>
where
    O: OutputPin,
    I: InputPin<Error = O::Error>,
    D: DelayNs,
{
    let levels = board.scan().await?;
    let result = scanner.scan_and_publish(&levels, cell);

    if keyboard.lock().await.update(&result) {
        #[cfg(feature = "defmt")]
        defmt::debug!("Note: {=str}, keys: {=u32:b}", result.label(), result.matrix.bits());
    }

    Ok(result)
}

/// Periodic key scan loop.
///
/// This is a regular `async fn`, not an Embassy `#[task]`. Embassy tasks
/// cannot be generic, so wrap it in a concrete task:
///
/// ```ignore
/// #[embassy_executor::task]
/// async fn scan_task(
///     board: Board,
///     scanner: Scanner,
///     keyboard: &'static Mutex<CriticalSectionRawMutex, KeyboardState>,
/// ) {
///     key_scan_task(board, scanner, &CURRENT_INCREMENT, keyboard, ScanConfig::default()).await;
/// }
/// ```
///
/// Runs [`scan_cycle`] once per period on absolute deadlines, so scan time
/// does not add drift. A failed cycle is logged and the loop carries on
/// with the next tick.
#[cfg(feature = "task")]
pub async fn key_scan_task<O, I, D>(
    mut board: KeyMatrixBoard<O, I, D>,
    scanner: Scanner,
    cell: &'static IncrementCell,
    keyboard: &'static Mutex<CriticalSectionRawMutex, KeyboardState>,
    config: ScanConfig,
) where
    O: OutputPin,
    O::Error: core::fmt::Debug,
    I: InputPin<Error = O::Error>,
    D: DelayNs,
{
    #[cfg(feature = "defmt")]
    defmt::info!("Key scan running at {} Hz", config.scan_frequency_hz);

    let mut ticker = Ticker::every(Duration::from_millis(config.scan_period_ms()));

    loop {
        ticker.next().await;

        if let Err(_e) = scan_cycle(&mut board, &scanner, cell, keyboard).await {
            #[cfg(feature = "defmt")]
            defmt::warn!("Key scan failed: {}", _e);
        }
    }
}
