//! Presentation formatter for the usage toast.
//!
//! Everything here is a pure function of its inputs.

use crate::models::{Toast, ToastVariant, UsageSnapshot};

/// Default number of cells in the quota bar.
pub const DEFAULT_BAR_WIDTH: usize = 20;

// Progress bar characters
const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

// Severity thresholds, in percent used
const ERROR_THRESHOLD: f64 = 90.0;
const WARNING_THRESHOLD: f64 = 75.0;

/// Percentage of `total` consumed by `used`, rounded half away from zero
/// and clamped to `0..=100`.
///
/// A zero or invalid `total` reads as full when anything was used.
pub fn usage_percentage(used: f64, total: f64) -> u32 {
    if !(total.is_finite() && total > 0.0) {
        return if used > 0.0 { 100 } else { 0 };
    }

    let percent = ((used / total) * 100.0).round();
    if percent.is_nan() || percent <= 0.0 {
        0
    } else if percent >= 100.0 {
        100
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = percent as u32;
        percent
    }
}

/// Splits `width` cells into `(filled, empty)`.
///
/// The fill count derives from the rounded percentage, not the raw ratio.
pub fn bar_cells(used: f64, total: f64, width: usize) -> (usize, usize) {
    let percent = f64::from(usage_percentage(used, total));

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = ((percent / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);

    (filled, width - filled)
}

/// Renders the quota bar: `filled` solid blocks followed by light blocks.
pub fn progress_bar(used: f64, total: f64, width: usize) -> String {
    let (filled, empty) = bar_cells(used, total, width);

    let mut bar = String::with_capacity((filled + empty) * BAR_FULL.len_utf8());
    bar.extend(std::iter::repeat_n(BAR_FULL, filled));
    bar.extend(std::iter::repeat_n(BAR_EMPTY, empty));
    bar
}

/// Renders integral values bare and everything else with one decimal.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Maps a raw usage percentage to toast styling.
pub fn severity_for(percent: f64) -> ToastVariant {
    if percent >= ERROR_THRESHOLD {
        ToastVariant::Error
    } else if percent >= WARNING_THRESHOLD {
        ToastVariant::Warning
    } else {
        ToastVariant::Info
    }
}

/// Builds the two-line usage text.
///
/// ```text
/// ███████████████████░ 95%
/// 285/300 • 15 left
/// ```
pub fn usage_message(snapshot: &UsageSnapshot) -> String {
    let bar = progress_bar(snapshot.used, snapshot.quota, DEFAULT_BAR_WIDTH);
    let remaining = (snapshot.quota - snapshot.used).max(0.0);

    format!(
        "{} {}%\n{}/{} • {} left",
        bar,
        format_number(snapshot.used_percent()),
        format_number(snapshot.used),
        format_number(snapshot.quota),
        format_number(remaining),
    )
}

/// Builds the usage summary toast, styled by severity.
pub fn usage_toast(snapshot: &UsageSnapshot) -> Toast {
    Toast::usage(usage_message(snapshot), severity_for(snapshot.used_percent()))
}

// ============================================================================
// Tests
// ============================================================================
