use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::date::{days_in_month, enumerate_days};
use crate::Date;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum PeriodError {
    #[error("Unknown pay period frequency {0:?}, expected one of WEEKLY, BIWEEKLY, SEMI_MONTHLY, MONTHLY")]
    InvalidFrequency(String),
    #[error("Biweekly anchor {0} is not a Monday")]
    AnchorNotMonday(Date),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Weekly,
    Biweekly,
    SemiMonthly,
    Monthly,
}

impl Frequency {
    pub const ALL: [Frequency; 4] = [
        Frequency::Weekly,
        Frequency::Biweekly,
        Frequency::SemiMonthly,
        Frequency::Monthly,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Frequency::Weekly => "WEEKLY",
            Frequency::Biweekly => "BIWEEKLY",
            Frequency::SemiMonthly => "SEMI_MONTHLY",
            Frequency::Monthly => "MONTHLY",
        }
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Frequency {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Frequency::ALL
            .into_iter()
            .find(|f| f.name() == normalized)
            .ok_or_else(|| PeriodError::InvalidFrequency(s.to_owned()))
    }
}

/// Computes period boundaries.
///
/// Biweekly periods are counted in 14 day steps from a fixed Monday so that
/// they line up the same way regardless of the year they are looked up in.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PeriodCalculator {
    anchor: Date,
}

impl Default for PeriodCalculator {
    fn default() -> Self {
        Self {
            anchor: Date::from_ymd(2024, 1, 1).unwrap(),
        }
    }
}

impl PeriodCalculator {
    pub fn with_anchor(anchor: Date) -> Result<Self, PeriodError> {
        if anchor.weekday() == Weekday::Mon {
            Ok(Self { anchor })
        } else {
            Err(PeriodError::AnchorNotMonday(anchor))
        }
    }

    #[must_use]
    pub fn anchor(&self) -> Date {
        self.anchor
    }

    #[must_use]
    pub fn start_of_period(&self, frequency: Frequency, reference: Date) -> Date {
        let monday = || reference.offset(-i64::from(reference.weekday().num_days_from_monday()));
        let start = match frequency {
            Frequency::Weekly => monday(),
            Frequency::Biweekly => {
                let monday = monday();
                let offset = monday.days_since(self.anchor).rem_euclid(14);
                monday.offset(-offset)
            }
            Frequency::SemiMonthly => {
                let day = if reference.day() <= 15 { 1 } else { 16 };
                reference.with_day(day).unwrap_or(reference)
            }
            Frequency::Monthly => reference.with_day(1).unwrap_or(reference),
        };
        debug!(%frequency, %reference, %start, "computed start of period");
        start
    }

    #[must_use]
    pub fn period(&self, frequency: Frequency, reference: Date) -> Period {
        let start = self.start_of_period(frequency, reference);
        Period {
            frequency,
            start,
            len: days_in_period(frequency, start),
        }
    }

    #[must_use]
    pub fn next(&self, period: &Period) -> Period {
        self.period(period.frequency, period.end().offset(1))
    }

    #[must_use]
    pub fn previous(&self, period: &Period) -> Period {
        self.period(period.frequency, period.start.offset(-1))
    }
}

#[must_use]
pub fn start_of_period(frequency: Frequency, reference: Date) -> Date {
    PeriodCalculator::default().start_of_period(frequency, reference)
}

#[must_use]
pub fn days_in_period(frequency: Frequency, period_start: Date) -> usize {
    match frequency {
        Frequency::Weekly => 7,
        Frequency::Biweekly => 14,
        Frequency::SemiMonthly => {
            if period_start.day() <= 15 {
                15
            } else {
                days_in_month(period_start.year(), period_start.month()) as usize - 15
            }
        }
        Frequency::Monthly => days_in_month(period_start.year(), period_start.month()) as usize,
    }
}

/// A contiguous run of days starting at a canonical period start.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Period {
    pub frequency: Frequency,
    pub start: Date,
    pub len: usize,
}

impl Period {
    #[must_use]
    pub fn days(&self) -> Vec<Date> {
        enumerate_days(self.start, self.len)
    }

    #[must_use]
    pub fn end(&self) -> Date {
        self.start.offset(self.len as i64 - 1)
    }

    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        (self.start..=self.end()).contains(&date)
    }

    #[must_use]
    pub fn index_of(&self, date: Date) -> Option<usize> {
        self.contains(date)
            .then(|| usize::try_from(date.days_since(self.start)).ok())
            .flatten()
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.start, self.end())
    }
}
