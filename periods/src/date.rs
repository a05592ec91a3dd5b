use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate, Weekday};
use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::Date;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum DateError {
    #[error("Expected a date in the format MM/DD/YYYY, got {0:?}")]
    InvalidDateFormat(String),
    #[error("{0:?} is not a valid calendar date")]
    InvalidCalendarDate(String),
}

fn mdy_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{4})$").unwrap())
}

/// Parses `M{1,2}/D{1,2}/YYYY`.
///
/// Unlike lenient date parsers, an out of range day or month is never rolled
/// over into the following month.
pub fn parse_strict_mdy(text: &str) -> Result<Date, DateError> {
    let captures = mdy_pattern()
        .captures(text)
        .ok_or_else(|| DateError::InvalidDateFormat(text.to_owned()))?;
    let field = |i: usize| {
        captures[i]
            .parse::<u32>()
            .map_err(|_| DateError::InvalidDateFormat(text.to_owned()))
    };
    let (month, day, year) = (field(1)?, field(2)?, field(3)?);
    let year = i32::try_from(year).map_err(|_| DateError::InvalidDateFormat(text.to_owned()))?;
    NaiveDate::from_ymd_opt(year, month, day)
        .map(Date)
        .ok_or_else(|| DateError::InvalidCalendarDate(text.to_owned()))
}

#[must_use]
pub fn format_mdy(date: Date) -> String {
    date.to_string()
}

/// `count` consecutive days starting at `start`, inclusive.
#[must_use]
pub fn enumerate_days(start: Date, count: usize) -> Vec<Date> {
    start.0.iter_days().take(count).map(Date).collect()
}

#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(31, |last| last.day())
}

#[must_use]
pub fn is_weekend(date: Date) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

impl Display for Date {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:0>2}/{:0>2}/{:0>4}",
            self.0.month(),
            self.0.day(),
            self.0.year()
        )
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_strict_mdy(s)
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_strict_mdy(&text).map_err(D::Error::custom)
    }
}
