//! Core of the keytone single-voice synthesizer.
//!
//! Everything in this crate is hardware-independent and runs on the host
//! under `cargo test`. The firmware wires it to real pins, timers and the
//! display.
//!
//! # Architecture
//!
//! ```text
//! IncrementTable ──▶ Scanner ──▶ IncrementCell ──▶ Oscillator ──▶ AudioSink
//!   (startup)        (20 Hz)      (AtomicU32)      (22 kHz)        (PWM)
//!                       │
//!                       └──▶ KeyboardState ──▶ display task (10 Hz)
//! ```
//!
//! - [`tuning`] computes the twelve 32-bit phase increments once at startup.
//! - [`keyboard`] decodes raw key matrix levels into a
//!   [`SwitchMatrixState`](keyboard::SwitchMatrixState) and the winning
//!   [`ActiveNote`](keyboard::ActiveNote).
//! - [`IncrementCell`] is the only state shared between the scan task and
//!   the sample interrupt.
//! - [`Oscillator`] advances a wrapping phase accumulator once per sample
//!   and emits an 8-bit sawtooth sample.
//!
//! # Crate Features
//!
//! - **`defmt`** — `defmt::Format` on public types and structured logging.

#![no_std]

mod cell;
pub mod keyboard;
mod oscillator;
pub mod tuning;

pub use cell::IncrementCell;
pub use oscillator::{AudioSink, Oscillator, SAMPLE_MIDPOINT};
