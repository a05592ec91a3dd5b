//! Free-form hour entry.
//!
//! Parsing is lenient: text that matches none of the accepted forms counts as
//! zero hours instead of failing.

use std::sync::OnceLock;

use regex::Regex;

use crate::{Duration, Minutes};

fn minutes_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^([0-9]{1,4})\s*m(?:in)?$").unwrap())
}

fn decimal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[+-]?(?:[0-9]+(?:[.,][0-9]*)?|[.,][0-9]+)$").unwrap())
}

/// Parses `8`, `7.5`, `7,5`, `8:30`, `8:5`, `30m` or `30min` into fractional hours.
#[must_use]
pub fn parse_hours(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    if let Some(captures) = minutes_pattern().captures(text) {
        return captures[1].parse::<u32>().map_or(0.0, |m| f64::from(m) / 60.0);
    }
    if let Some((hours, minutes)) = text.split_once(':') {
        return parse_colon(hours.trim(), minutes.trim());
    }
    if decimal_pattern().is_match(text) {
        return text.replace(',', ".").parse::<f64>().unwrap_or(0.0);
    }
    0.0
}

fn parse_colon(hours: &str, minutes: &str) -> f64 {
    let negative = hours.starts_with('-');
    let hours = hours.parse::<i64>().map_or(0, i64::unsigned_abs);
    let minutes = minutes.parse::<i64>().map_or(0, |m| m.clamp(0, 59));
    #[allow(clippy::cast_precision_loss)]
    let value = hours as f64 + minutes as f64 / 60.0;
    if negative {
        -value
    } else {
        value
    }
}

/// Rounds fractional hours to the nearest whole minute.
#[must_use]
pub fn hours_to_minutes(hours: f64) -> i64 {
    if hours.is_finite() {
        #[allow(clippy::cast_possible_truncation)]
        let minutes = (hours * 60.0).round() as i64;
        minutes
    } else {
        0
    }
}

/// Like [`hours_to_minutes`] but clamped to the non-negative range of [`Minutes`].
#[must_use]
pub fn to_minutes(hours: f64) -> Minutes {
    match u32::try_from(hours_to_minutes(hours)) {
        Ok(minutes) => Minutes::from(minutes),
        Err(_) if hours > 0.0 => Minutes::from(u32::MAX),
        Err(_) => Minutes::ZERO,
    }
}

/// Renders fractional hours as `H:MM`, e.g. `7:05`.
#[must_use]
pub fn format_hours(hours: f64) -> String {
    Duration(hours_to_minutes(hours)).to_string()
}
