use std::fmt::{Display, Formatter};

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::period::{days_in_period, Frequency, Period, PeriodCalculator};
use crate::verify::{validate, Mode, ValidationError};
use crate::Date;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum SheetError {
    #[error("{found} is not the start of a {frequency} period, expected {expected}")]
    NotPeriodStart {
        frequency: Frequency,
        found: Date,
        expected: Date,
    },
    #[error("Entry {entry} has {found} {field} but the period has {expected} days")]
    RowLength {
        entry: usize,
        field: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Workflow status of a timesheet. Transitions are decided elsewhere and only
/// reflected here, apart from marking a local submission.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    Draft,
    PendingApproval,
    Approved,
    Rejected,
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Status::Draft => "DRAFT",
            Status::PendingApproval => "PENDING_APPROVAL",
            Status::Approved => "APPROVED",
            Status::Rejected => "REJECTED",
        })
    }
}

/// One (project, task) row with a slot per day of the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub project: String,
    pub task: String,
    /// Cells that are not numbers load as NaN and fail validation.
    #[serde(deserialize_with = "lenient_hours")]
    pub hours: Vec<f64>,
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default)]
    pub enabled: Vec<bool>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HourCell {
    Number(f64),
    Other(IgnoredAny),
}

fn lenient_hours<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
    let cells = Vec::<HourCell>::deserialize(deserializer)?;
    Ok(cells
        .into_iter()
        .map(|cell| match cell {
            HourCell::Number(hours) => hours,
            HourCell::Other(IgnoredAny) => f64::NAN,
        })
        .collect())
}

impl TimeEntry {
    #[must_use]
    pub fn new(project: impl Into<String>, task: impl Into<String>, days: usize) -> Self {
        Self {
            project: project.into(),
            task: task.into(),
            hours: vec![0.0; days],
            comments: vec![String::new(); days],
            enabled: vec![true; days],
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        format!("{} / {}", self.project, self.task)
    }

    #[must_use]
    pub fn is_enabled(&self, day: usize) -> bool {
        self.enabled.get(day).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn total_hours(&self) -> f64 {
        self.hours.iter().filter(|h| h.is_finite()).sum()
    }

    fn conform(&mut self, index: usize, days: usize) -> Result<(), SheetError> {
        let check = |field, found| {
            if found == days {
                Ok(())
            } else {
                Err(SheetError::RowLength {
                    entry: index,
                    field,
                    expected: days,
                    found,
                })
            }
        };
        check("hours", self.hours.len())?;
        if self.comments.is_empty() {
            self.comments.resize(days, String::new());
        }
        if self.enabled.is_empty() {
            self.enabled.resize(days, true);
        }
        check("comments", self.comments.len())?;
        check("enabled flags", self.enabled.len())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timesheet {
    pub frequency: Frequency,
    pub period_start: Date,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub entries: Vec<TimeEntry>,
}

impl Timesheet {
    #[must_use]
    pub fn new(period: Period) -> Self {
        Self {
            frequency: period.frequency,
            period_start: period.start,
            status: Status::Draft,
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn period(&self) -> Period {
        Period {
            frequency: self.frequency,
            start: self.period_start,
            len: days_in_period(self.frequency, self.period_start),
        }
    }

    #[must_use]
    pub fn days(&self) -> Vec<Date> {
        self.period().days()
    }

    /// Checks that the sheet starts on a period boundary and that every row
    /// has exactly one slot per day. Missing comment and enabled columns are
    /// filled in with blank comments and editable cells.
    pub fn conform(&mut self, calculator: &PeriodCalculator) -> Result<(), SheetError> {
        let expected = calculator.start_of_period(self.frequency, self.period_start);
        if expected != self.period_start {
            return Err(SheetError::NotPeriodStart {
                frequency: self.frequency,
                found: self.period_start,
                expected,
            });
        }
        let days = self.period().len;
        self.entries
            .iter_mut()
            .enumerate()
            .try_for_each(|(index, entry)| entry.conform(index, days))
    }

    pub fn add_entry(&mut self, project: impl Into<String>, task: impl Into<String>) -> usize {
        let days = self.period().len;
        self.entries.push(TimeEntry::new(project, task, days));
        self.entries.len() - 1
    }

    #[must_use]
    pub fn total_hours(&self) -> f64 {
        self.entries.iter().map(TimeEntry::total_hours).sum()
    }

    pub fn validate(&self, mode: Mode) -> Result<(), ValidationError> {
        validate(&self.entries, &self.days(), mode)
    }
}
