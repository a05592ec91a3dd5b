use crate::hours::to_minutes;
use crate::normalize::{normalize_day_minutes, DAY_MINUTES};
use crate::sheet::Timesheet;
use crate::{Date, Minutes};

/// Minutes shown for one day of the summary.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DaySummary {
    pub date: Date,
    /// Per entry, scaled down when the day is over 24 hours.
    pub minutes: Vec<Minutes>,
    /// Per entry, as recorded.
    pub recorded: Vec<Minutes>,
}

impl DaySummary {
    #[must_use]
    pub fn shown(&self) -> Minutes {
        self.minutes.iter().copied().sum()
    }

    #[must_use]
    pub fn recorded_total(&self) -> Minutes {
        self.recorded.iter().copied().sum()
    }

    #[must_use]
    pub fn is_scaled(&self) -> bool {
        self.shown() != self.recorded_total()
    }
}

/// Read-only per day breakdown of a timesheet. Built from a copy of the
/// recorded values, the timesheet itself is left as entered.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Summary {
    pub days: Vec<DaySummary>,
}

impl Summary {
    #[must_use]
    pub fn new(sheet: &Timesheet) -> Self {
        let days = sheet
            .days()
            .into_iter()
            .enumerate()
            .map(|(day, date)| {
                let recorded = sheet
                    .entries
                    .iter()
                    .map(|entry| {
                        entry
                            .hours
                            .get(day)
                            .map_or(Minutes::ZERO, |&h| to_minutes(h))
                    })
                    .collect::<Vec<_>>();
                let raw = recorded.iter().copied().map(Minutes::into_inner).collect::<Vec<_>>();
                let minutes = normalize_day_minutes(&raw, DAY_MINUTES)
                    .into_iter()
                    .map(Minutes::from)
                    .collect();
                DaySummary {
                    date,
                    minutes,
                    recorded,
                }
            })
            .collect();
        Self { days }
    }

    /// Minutes one entry recorded over the whole period, without scaling.
    #[must_use]
    pub fn entry_recorded(&self, entry: usize) -> Minutes {
        self.days
            .iter()
            .filter_map(|day| day.recorded.get(entry).copied())
            .sum()
    }

    #[must_use]
    pub fn total(&self) -> Minutes {
        self.days.iter().map(DaySummary::shown).sum()
    }

    #[must_use]
    pub fn any_scaled(&self) -> bool {
        self.days.iter().any(DaySummary::is_scaled)
    }
}
