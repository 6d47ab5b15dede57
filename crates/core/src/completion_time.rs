//! Parsing of learner-facing completion times.
//!
//! Stored values come in many shapes: `30`, `"30m"`, `"1h 30m"`, `"1.5h"`,
//! `"45 minutes"`. Everything is reduced to whole minutes.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::CoreError;

static DURATION_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d+(?:[.,]\d+)?)\s*(hours|hour|hrs|hr|h|minutes|minute|mins|min|m)?")
        .unwrap_or_else(|e| panic!("invalid duration regex: {e}"))
});

/// Parse a completion time string into minutes.
///
/// A bare number is minutes. Components may be chained (`"1h 30m"`).
pub fn parse_completion_minutes(raw: &str) -> Result<u32, CoreError> {
    let mut rest = raw.trim();
    if rest.is_empty() {
        return Err(CoreError::InvalidCompletionTime(raw.to_owned()));
    }

    let mut total = 0.0_f64;
    while !rest.trim().is_empty() {
        let caps = DURATION_PART
            .captures(rest)
            .ok_or_else(|| CoreError::InvalidCompletionTime(raw.to_owned()))?;
        let whole = caps.get(0).map_or("", |m| m.as_str());
        let number: f64 = caps
            .get(1)
            .map(|m| m.as_str().replace(',', "."))
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| CoreError::InvalidCompletionTime(raw.to_owned()))?;
        let is_hours = caps
            .get(2)
            .is_some_and(|unit| unit.as_str().to_lowercase().starts_with('h'));
        total += if is_hours { number * 60.0 } else { number };
        rest = rest.get(whole.len()..).unwrap_or("");
    }

    Ok(minutes_from_f64(total))
}

/// Read a completion time from a JSON value (number of minutes or string).
#[must_use]
pub fn completion_minutes_from_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| *v >= 0.0).map(minutes_from_f64),
        Value::String(s) => match parse_completion_minutes(s) {
            Ok(m) => Some(m),
            Err(_) => {
                tracing::warn!(value = %s, "unparseable completionTime, ignoring");
                None
            },
        },
        _ => None,
    }
}

/// Read a lesson `hours` value (number or numeric string) as minutes.
#[must_use]
pub fn hours_value_to_minutes(value: &Value) -> Option<u32> {
    let hours = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    }?;
    (hours > 0.0 && hours.is_finite()).then(|| minutes_from_f64(hours * 60.0))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "clamped to u32 range")]
fn minutes_from_f64(minutes: f64) -> u32 {
    minutes.round().clamp(0.0, f64::from(u32::MAX)) as u32
}
