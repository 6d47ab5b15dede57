//! Display formatting for hours and durations.
//!
//! Zero values render as [`ZERO_PLACEHOLDER`] everywhere, never as `0h`.

use crate::constants::{RATE_MINUTES_PER_HOUR, ZERO_PLACEHOLDER};

fn tenths_to_hours(tenths: u64) -> String {
    if tenths == 0 {
        "<0.1h".to_owned()
    } else if tenths % 10 == 0 {
        format!("{}h", tenths / 10)
    } else {
        format!("{}.{}h", tenths / 10, tenths % 10)
    }
}

/// `90` → `"1.5h"`, `120` → `"2h"`, `0` → `"–"`.
#[must_use]
pub fn format_hours(minutes: u64) -> String {
    if minutes == 0 {
        return ZERO_PLACEHOLDER.to_owned();
    }
    tenths_to_hours((minutes * 10 + 30) / 60)
}

/// Creation effort in rate-minutes rendered as hours.
#[must_use]
pub fn format_creation_hours(rate_minutes: u64) -> String {
    if rate_minutes == 0 {
        return ZERO_PLACEHOLDER.to_owned();
    }
    tenths_to_hours((rate_minutes * 10 + RATE_MINUTES_PER_HOUR / 2) / RATE_MINUTES_PER_HOUR)
}

/// `90` → `"1h 30m"`, `45` → `"45m"`, `120` → `"2h"`.
#[must_use]
pub fn format_duration(minutes: u64) -> String {
    match (minutes / 60, minutes % 60) {
        (0, 0) => ZERO_PLACEHOLDER.to_owned(),
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// Minutes as fractional hours rounded to two decimals.
#[must_use]
#[allow(clippy::cast_precision_loss, reason = "report values are far below 2^52")]
pub fn minutes_to_hours(minutes: u64) -> f64 {
    (minutes as f64 / 60.0 * 100.0).round() / 100.0
}

/// Rate-minutes as fractional creation hours rounded to two decimals.
#[must_use]
#[allow(clippy::cast_precision_loss, reason = "report values are far below 2^52")]
pub fn rate_minutes_to_hours(rate_minutes: u64) -> f64 {
    (rate_minutes as f64 / RATE_MINUTES_PER_HOUR as f64 * 100.0).round() / 100.0
}
