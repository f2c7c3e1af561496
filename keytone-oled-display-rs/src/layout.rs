//! Display layout types and rendering logic.
//!
//! This module defines the [`DisplayConfig`] geometry, the immutable
//! [`DisplayState`] snapshot, and the [`render_display`] function that draws
//! a frame using `embedded-graphics`.

use core::fmt::Write;

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use heapless::String;

use keytone::keyboard::{KeyboardState, SwitchMatrixState, KEY_COUNT};

/// Maximum usable length of the title and label buffers.
const TEXT_CAPACITY: usize = 15;

// ── DisplayConfig ────────────────────────────────────────────────────────

/// Configuration for the display layout and update task.
///
/// All layout geometry lives here. [`DisplayConfig::default()`] matches the
/// 128×32 panel: three text lines at 10 px pitch, refreshed at 10 Hz.
#[derive(Debug, Clone, Copy)]
pub struct DisplayConfig {
    /// Display refresh rate in Hz. Default: 10.
    pub update_frequency_hz: u32,
    /// Text on the first line. Default: `"Hello World"`.
    pub title: &'static str,

    // ── Layout geometry ──────────────────────────────────────────────
    /// Left margin for every text line. Default: 2.
    pub text_x: i32,
    /// Baseline of the title line. Default: 10.
    pub title_y: i32,
    /// Baseline of the key bitmap line. Default: 20.
    pub matrix_y: i32,
    /// Baseline of the note label line. Default: 30.
    pub label_y: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            update_frequency_hz: 10,
            title: "Hello World",
            text_x: 2,
            title_y: 10,
            matrix_y: 20,
            label_y: 30,
        }
    }
}

impl DisplayConfig {
    /// Convert the configured frequency to a timer period in milliseconds.
    ///
    /// Formula: `1000 / update_frequency_hz`, with 0 Hz treated as 1 Hz.
    pub fn update_period_ms(&self) -> u64 {
        1000 / (self.update_frequency_hz as u64).max(1)
    }
}

// ── DisplayState ─────────────────────────────────────────────────────────

/// Immutable snapshot of everything the display needs to render one frame.
///
/// Strings are stored as null-padded UTF-8 byte buffers with a maximum
/// length of 15 usable characters (the 16th byte is always `\0`).
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayState {
    /// Title line, null-padded UTF-8 (max 15 chars).
    pub title: [u8; 16],
    /// Key bitmap, bit `4 * row + column`.
    pub matrix: SwitchMatrixState,
    /// Active note name, null-padded UTF-8. Empty when silent.
    pub label: [u8; 16],
}

impl DisplayState {
    /// Construct from raw parts.
    ///
    /// Strings are copied into fixed-size buffers and silently truncated
    /// if longer than 15 characters.
    pub fn new(title: &str, matrix: SwitchMatrixState, label: &str) -> Self {
        let mut state = Self {
            matrix,
            ..Self::default()
        };
        copy_truncated(&mut state.title, title);
        copy_truncated(&mut state.label, label);
        state
    }

    /// Snapshot a [`KeyboardState`] under `title`.
    pub fn from_keyboard(title: &str, keyboard: &KeyboardState) -> Self {
        Self::new(title, keyboard.matrix, keyboard.label())
    }

    /// Convert a fixed-size null-padded byte array back to a `&str`.
    ///
    /// Stops at the first null byte. Returns `""` if the first byte is
    /// null or the slice is not valid UTF-8.
    pub fn bytes_to_str(bytes: &[u8]) -> &str {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        core::str::from_utf8(&bytes[..end]).unwrap_or("")
    }
}

fn copy_truncated(dst: &mut [u8; 16], src: &str) {
    let bytes = src.as_bytes();
    let len = bytes.len().min(TEXT_CAPACITY);
    dst[..len].copy_from_slice(&bytes[..len]);
}

// ── Formatting ───────────────────────────────────────────────────────────

/// Format the key bitmap in binary, most significant set bit first.
///
/// No leading zeros; an empty matrix formats as `"0"`.
pub fn format_matrix(matrix: SwitchMatrixState) -> String<KEY_COUNT> {
    let mut buf = String::new();
    // KEY_COUNT digits always fit.
    let _ = write!(buf, "{:b}", matrix.bits());
    buf
}

// ── Rendering ────────────────────────────────────────────────────────────

/// Render a [`DisplayState`] to a display buffer using `embedded-graphics`.
///
/// # Layout
///
/// ```text
/// ┌──────────────────────────────┐
/// │ Hello World                  │  ← title_y
/// │ 1000000100                   │  ← matrix_y
/// │ A                            │  ← label_y
/// └──────────────────────────────┘
/// ```
///
/// Blank title or label lines are skipped; the bitmap line is always drawn.
pub fn render_display<D>(
    display: &mut D,
    state: &DisplayState,
    config: &DisplayConfig,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let text_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

    let title = DisplayState::bytes_to_str(&state.title);
    if !title.is_empty() {
        Text::with_baseline(
            title,
            Point::new(config.text_x, config.title_y),
            text_style,
            Baseline::Bottom,
        )
        .draw(display)?;
    }

    let bits = format_matrix(state.matrix);
    Text::with_baseline(
        bits.as_str(),
        Point::new(config.text_x, config.matrix_y),
        text_style,
        Baseline::Bottom,
    )
    .draw(display)?;

    let label = DisplayState::bytes_to_str(&state.label);
    if !label.is_empty() {
        Text::with_baseline(
            label,
            Point::new(config.text_x, config.label_y),
            text_style,
            Baseline::Bottom,
        )
        .draw(display)?;
    }

    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────
