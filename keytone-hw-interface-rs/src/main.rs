//! keytone-hw-interface
//!
//! Key matrix → oscillator → PWM audio firmware for the Raspberry Pi Pico 2,
//! with a 128×32 OLED readout. Wires the three library crates into a
//! playable single-voice instrument:
//!
//! 1. The scan task reads the 3 × 4 key matrix at 20 Hz, decodes the winning
//!    note and stores its phase increment in `CURRENT_INCREMENT`.
//! 2. The sample task runs on a high-priority interrupt executor at 22 kHz
//!    (rounded to whole timer ticks; the increment table is tuned to the
//!    rounded rate).
//!    Each tick it loads the increment, advances the oscillator and writes
//!    the 8-bit sawtooth sample to the PWM compare register.
//! 3. The OLED task wakes at 10 Hz, snapshots the keyboard state and
//!    redraws the title, key bitmap and note name when they change.
//! 4. The heartbeat task blinks the on-board LED at the display rate.
//!
//! Pin assignments:
//!
//! ```text
//! RA0, RA1, RA2 → GP2, GP3, GP4    row address (decoder A0–A2)
//! REN           → GP5              row enable / latch clock
//! OUT           → GP6              output latch data
//! C0 – C3       → GP7 – GP10       column inputs, pull-up, low = pressed
//! AUDIO         → GP16             PWM slice 0 channel A, 8-bit
//! I2C_SDA       → GP20
//! I2C_SCL       → GP21
//! LED           → GP25
//! ```

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::I2C0;
use embassy_rp::pwm::{self, Pwm, PwmOutput};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Delay, Duration, Ticker, TICK_HZ};
use embedded_hal::pwm::SetDutyCycle;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use key_matrix_driver::{key_scan_task, KeyMatrixBoard};
use keytone::keyboard::{KeyboardState, ScanConfig, Scanner};
use keytone::tuning::{IncrementTable, TuningConfig};
use keytone::{AudioSink, IncrementCell, Oscillator, SAMPLE_MIDPOINT};
use keytone_oled_display_rs::{display_update_task, DisplayConfig, OledDriver, DEFAULT_ADDRESS};

// ---------------------------------------------------------------------------
// Boot block and interrupt binding
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

/// Runs the sample task above every thread-mode task.
static EXECUTOR_AUDIO: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_AUDIO.on_interrupt()
}

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

/// Phase increment of the sounding note, 0 for silence. Written by the scan
/// task, read by the sample task.
static CURRENT_INCREMENT: IncrementCell = IncrementCell::new();

/// Latest keyboard snapshot: written by the scan task, read by the OLED
/// task.
static KEYBOARD: StaticCell<Mutex<CriticalSectionRawMutex, KeyboardState>> = StaticCell::new();

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

type Board = KeyMatrixBoard<Output<'static>, Input<'static>, Delay>;

type OledI2c = I2c<'static, I2C0, i2c::Async>;

/// PWM counter wrap; 256 steps give one duty level per 8-bit sample.
const PWM_TOP: u16 = 255;

// ---------------------------------------------------------------------------
// Audio output
// ---------------------------------------------------------------------------

/// Writes each sample straight into the PWM compare register.
struct PwmAudioSink {
    channel: PwmOutput<'static>,
}

impl AudioSink for PwmAudioSink {
    #[inline]
    fn write_sample(&mut self, sample: u8) {
        // `PwmError` is only returned for a duty above the counter top; the
        // clamp rules that out, and the sample path has nowhere to report to.
        let duty = (sample as u16).min(PWM_TOP);
        let _ = self.channel.set_duty_cycle(duty);
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Sample clock: one oscillator tick per `period`.
///
/// `period` must be the same tick count the increment table was tuned for.
#[embassy_executor::task]
async fn sample_task(mut sink: PwmAudioSink, cell: &'static IncrementCell, period: Duration) {
    info!("Sample task running every {} ticks", period.as_ticks());

    let mut oscillator = Oscillator::new();
    let mut ticker = Ticker::every(period);

    loop {
        ticker.next().await;
        oscillator.tick(cell, &mut sink);
    }
}

/// Thin wrapper that monomorphises the generic `key_scan_task`.
#[embassy_executor::task]
async fn scan_task(
    board: Board,
    scanner: Scanner,
    keyboard: &'static Mutex<CriticalSectionRawMutex, KeyboardState>,
    config: ScanConfig,
) {
    key_scan_task(board, scanner, &CURRENT_INCREMENT, keyboard, config).await;
}

/// Thin wrapper that monomorphises the generic `display_update_task`.
#[embassy_executor::task]
async fn oled_task(
    driver: OledDriver<OledI2c>,
    keyboard: &'static Mutex<CriticalSectionRawMutex, KeyboardState>,
    config: DisplayConfig,
) {
    display_update_task(driver, keyboard, config).await;
}

/// Blinks the on-board LED so a stalled thread executor is visible.
#[embassy_executor::task]
async fn heartbeat_task(mut led: Output<'static>, period: Duration) {
    let mut ticker = Ticker::every(period);
    loop {
        ticker.next().await;
        led.toggle();
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("keytone-hw-interface starting");

    // —— Tuning ————————————————————————————————————————————————————————————

    // The ticker can only wait whole time-base ticks, so tune the table to
    // the rate that period really gives (22 222 Hz for 22 kHz at 1 MHz).
    let requested = TuningConfig::default();
    let sample_period = Duration::from_ticks(requested.period_ticks(TICK_HZ));
    let tuning = requested.clocked_by(TICK_HZ, sample_period.as_ticks());
    let table = unwrap!(IncrementTable::new(&tuning));
    info!(
        "Sample rate {} Hz ({} ticks), increment table: {}",
        tuning.sample_rate_hz,
        sample_period.as_ticks(),
        table.as_array()
    );

    // —— Audio output ——————————————————————————————————————————————————————

    let mut pwm_config = pwm::Config::default();
    pwm_config.top = PWM_TOP;
    pwm_config.compare_a = SAMPLE_MIDPOINT as u16;
    let pwm = Pwm::new_output_a(p.PWM_SLICE0, p.PIN_16, pwm_config);
    let (channel, _) = pwm.split();
    let sink = PwmAudioSink {
        channel: unwrap!(channel),
    };

    // —— Key matrix and output latch ———————————————————————————————————————

    let mut board = KeyMatrixBoard::new(
        [
            Output::new(p.PIN_2, Level::Low),
            Output::new(p.PIN_3, Level::Low),
            Output::new(p.PIN_4, Level::Low),
        ],
        Output::new(p.PIN_5, Level::Low),
        Output::new(p.PIN_6, Level::Low),
        [
            Input::new(p.PIN_7, Pull::Up),
            Input::new(p.PIN_8, Pull::Up),
            Input::new(p.PIN_9, Pull::Up),
            Input::new(p.PIN_10, Pull::Up),
        ],
        Delay,
    );

    // The panel sits behind the output latch: release reset and enable it
    // before the OLED task sends its init sequence.
    if let Err(e) = board.power_up_display().await {
        error!("Display power-up failed: {}", e);
    }

    // —— Display ———————————————————————————————————————————————————————————

    let i2c = I2c::new_async(
        p.I2C0,
        p.PIN_21, // SCL
        p.PIN_20, // SDA
        Irqs,
        i2c::Config::default(),
    );
    let oled_driver = OledDriver::new(i2c, DEFAULT_ADDRESS);

    let keyboard = KEYBOARD.init(Mutex::new(KeyboardState::new()));
    let led = Output::new(p.PIN_25, Level::Low);

    // —— Spawn tasks ———————————————————————————————————————————————————————

    interrupt::SWI_IRQ_1.set_priority(Priority::P1);
    let audio_spawner = EXECUTOR_AUDIO.start(interrupt::SWI_IRQ_1);
    audio_spawner.spawn(unwrap!(sample_task(sink, &CURRENT_INCREMENT, sample_period)));

    let display_config = DisplayConfig::default();
    let heartbeat_period = Duration::from_millis(display_config.update_period_ms());

    spawner.spawn(unwrap!(scan_task(
        board,
        Scanner::new(table),
        keyboard,
        ScanConfig::default()
    )));
    spawner.spawn(unwrap!(oled_task(oled_driver, keyboard, display_config)));
    spawner.spawn(unwrap!(heartbeat_task(led, heartbeat_period)));

    info!("All tasks spawned");
}
