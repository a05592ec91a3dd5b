#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::fmt::{Display, Formatter};

use chrono::{Datelike, TimeDelta, Weekday};
use derive_more::{Add, From, Sum};

pub mod date;
pub mod edit;
pub mod hours;
pub mod normalize;
pub mod period;
pub mod report;
pub mod session;
pub mod sheet;
pub mod summary;
pub mod verify;

pub use chrono::NaiveDate;

/// A calendar day without a time component.
///
/// Displays and parses in the strict `MM/DD/YYYY` form, see [`date`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Date(pub NaiveDate);

impl Date {
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    #[must_use]
    pub fn today() -> Self {
        Self(chrono::Local::now().date_naive())
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    #[must_use]
    pub fn day(self) -> u32 {
        self.0.day()
    }

    #[must_use]
    pub fn weekday(self) -> Weekday {
        self.0.weekday()
    }

    /// The date `days` calendar days after (or before, if negative) this one.
    #[must_use]
    pub fn offset(self, days: i64) -> Self {
        Self(self.0 + TimeDelta::days(days))
    }

    #[must_use]
    pub fn days_since(self, earlier: Date) -> i64 {
        (self.0 - earlier.0).num_days()
    }

    #[must_use]
    pub fn with_day(self, day: u32) -> Option<Self> {
        self.0.with_day(day).map(Self)
    }
}

impl From<NaiveDate> for Date {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

/// A whole number of minutes.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, From, Add, Sum)]
pub struct Minutes(u32);

impl Minutes {
    pub const ZERO: Minutes = Minutes(0);

    #[must_use]
    pub fn into_inner(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn into_duration(self) -> Duration {
        Duration(i64::from(self.0))
    }
}

/// Signed minute count rendered as `H:MM`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Duration(pub i64);

impl Display for Duration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let minutes = self.0.unsigned_abs();
        write!(f, "{sign}{}:{:0>2}", minutes / 60, minutes % 60)
    }
}
