//! Two-phase cell edits.
//!
//! An edit is first proposed against an entry. Ordinary values commit right
//! away, values on weekends, holidays or long days are held as a
//! [`PendingEdit`] until the user confirms or discards them, and values above
//! 24 hours are refused outright.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use thiserror::Error;
use tracing::{debug, warn};

use crate::date::is_weekend;
use crate::hours::format_hours;
use crate::period::Period;
use crate::sheet::TimeEntry;
use crate::verify::exceeds_day;
use crate::Date;

pub const CONFIRM_ABOVE_HOURS: f64 = 8.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EditError {
    #[error("Day {0} is not part of the period")]
    DayOutOfRange(usize),
    #[error("Hours on {0} cannot be entered for this task")]
    CellDisabled(Date),
    #[error("{} hours on {date} is more than a day has", hours_text(.hours))]
    ExceedsDailyMax { date: Date, hours: f64 },
}

fn hours_text(hours: &f64) -> String {
    format_hours(*hours)
}

/// Days and amounts that need an explicit confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkCalendar {
    holidays: BTreeSet<Date>,
    confirm_above: f64,
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self {
            holidays: BTreeSet::new(),
            confirm_above: CONFIRM_ABOVE_HOURS,
        }
    }
}

impl WorkCalendar {
    #[must_use]
    pub fn new(holidays: impl IntoIterator<Item = Date>, confirm_above: f64) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
            confirm_above,
        }
    }

    #[must_use]
    pub fn is_holiday(&self, date: Date) -> bool {
        self.holidays.contains(&date)
    }

    #[must_use]
    pub fn is_day_off(&self, date: Date) -> bool {
        is_weekend(date) || self.is_holiday(date)
    }

    fn reasons(&self, date: Date, hours: f64) -> Vec<ConfirmReason> {
        let mut reasons = Vec::new();
        if hours <= 0.0 {
            return reasons;
        }
        if is_weekend(date) {
            reasons.push(ConfirmReason::Weekend);
        }
        if self.is_holiday(date) {
            reasons.push(ConfirmReason::Holiday);
        }
        if hours > self.confirm_above {
            reasons.push(ConfirmReason::LongDay(self.confirm_above));
        }
        reasons
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ConfirmReason {
    Weekend,
    Holiday,
    LongDay(f64),
}

impl Display for ConfirmReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfirmReason::Weekend => write!(f, "falls on a weekend"),
            ConfirmReason::Holiday => write!(f, "is a holiday"),
            ConfirmReason::LongDay(limit) => write!(f, "is more than {}", format_hours(*limit)),
        }
    }
}

#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum Proposal {
    Committed(TimeEntry),
    Pending(PendingEdit),
}

/// An edit held back until the user decides on it. The wrapped entry still
/// carries the value from before the edit.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEdit {
    entry: TimeEntry,
    day: usize,
    date: Date,
    hours: f64,
    reasons: Vec<ConfirmReason>,
}

impl PendingEdit {
    pub fn day(&self) -> usize {
        self.day
    }

    pub fn date(&self) -> Date {
        self.date
    }

    pub fn hours(&self) -> f64 {
        self.hours
    }

    pub fn previous(&self) -> f64 {
        self.entry.hours[self.day]
    }

    pub fn reasons(&self) -> &[ConfirmReason] {
        &self.reasons
    }

    /// Question to put to the user.
    pub fn prompt(&self) -> String {
        let reasons = self
            .reasons
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" and ");
        format!(
            "{} on {} {reasons}. Keep it?",
            format_hours(self.hours),
            self.date
        )
    }

    pub fn confirm(self) -> TimeEntry {
        debug!(date = %self.date, hours = self.hours, "confirmed pending edit");
        let mut entry = self.entry;
        entry.hours[self.day] = self.hours;
        entry
    }

    pub fn discard(self) -> TimeEntry {
        debug!(date = %self.date, hours = self.hours, "discarded pending edit");
        self.entry
    }
}

/// Proposes setting `hours` on `day` (an index into `period`) of `entry`.
pub fn propose_edit(
    entry: &TimeEntry,
    period: &Period,
    day: usize,
    hours: f64,
    calendar: &WorkCalendar,
) -> Result<Proposal, EditError> {
    if day >= period.len || day >= entry.hours.len() {
        return Err(EditError::DayOutOfRange(day));
    }
    let offset = i64::try_from(day).map_err(|_| EditError::DayOutOfRange(day))?;
    let date = period.start.offset(offset);
    if !entry.is_enabled(day) {
        return Err(EditError::CellDisabled(date));
    }
    if exceeds_day(hours) {
        warn!(%date, hours, "refused edit above the daily maximum");
        return Err(EditError::ExceedsDailyMax { date, hours });
    }

    let reasons = calendar.reasons(date, hours);
    if reasons.is_empty() {
        let mut entry = entry.clone();
        entry.hours[day] = hours;
        Ok(Proposal::Committed(entry))
    } else {
        Ok(Proposal::Pending(PendingEdit {
            entry: entry.clone(),
            day,
            date,
            hours,
            reasons,
        }))
    }
}

#[cfg(test)]
mod test {
    use crate::edit::{propose_edit, ConfirmReason, EditError, Proposal, WorkCalendar};
    use crate::period::{Frequency, Period, PeriodCalculator};
    use crate::sheet::TimeEntry;
    use crate::Date;

    // Mon 03/11/2024 - Sun 03/17/2024
    fn week() -> Period {
        let monday = Date::from_ymd(2024, 3, 11).unwrap();
        PeriodCalculator::default().period(Frequency::Weekly, monday)
    }

    fn entry() -> TimeEntry {
        TimeEntry::new("ACME", "Design", 7)
    }

    #[test]
    fn test_ordinary_edit_commits() {
        let proposal = propose_edit(&entry(), &week(), 0, 7.5, &WorkCalendar::default());
        let Ok(Proposal::Committed(entry)) = proposal else {
            panic!("expected a committed edit");
        };
        assert_eq!(entry.hours[0], 7.5);
    }

    #[test]
    fn test_weekend_edit_needs_confirmation() {
        let calendar = WorkCalendar::default();
        let Ok(Proposal::Pending(pending)) = propose_edit(&entry(), &week(), 5, 2.0, &calendar)
        else {
            panic!("expected a pending edit");
        };
        assert_eq!(pending.reasons(), [ConfirmReason::Weekend]);
        assert_eq!(pending.date(), Date::from_ymd(2024, 3, 16).unwrap());
        assert_eq!(pending.previous(), 0.0);
        assert_eq!(pending.prompt(), "2:00 on 03/16/2024 falls on a weekend. Keep it?");

        let confirmed = pending.clone().confirm();
        assert_eq!(confirmed.hours[5], 2.0);
        let discarded = pending.discard();
        assert_eq!(discarded, entry());
    }

    #[test]
    fn test_zero_on_weekend_commits() {
        let proposal = propose_edit(&entry(), &week(), 6, 0.0, &WorkCalendar::default());
        assert!(matches!(proposal, Ok(Proposal::Committed(_))));
    }

    #[test]
    fn test_holiday_and_long_day() {
        let holiday = Date::from_ymd(2024, 3, 13).unwrap();
        let calendar = WorkCalendar::new([holiday], 8.0);
        let Ok(Proposal::Pending(pending)) = propose_edit(&entry(), &week(), 2, 9.0, &calendar)
        else {
            panic!("expected a pending edit");
        };
        assert_eq!(
            pending.reasons(),
            [ConfirmReason::Holiday, ConfirmReason::LongDay(8.0)]
        );
        assert_eq!(
            pending.prompt(),
            "9:00 on 03/13/2024 is a holiday and is more than 8:00. Keep it?"
        );

        let proposal = propose_edit(&entry(), &week(), 1, 8.0, &calendar);
        assert!(matches!(proposal, Ok(Proposal::Committed(_))));
    }

    #[test]
    fn test_rejections() {
        let calendar = WorkCalendar::default();
        assert_eq!(
            propose_edit(&entry(), &week(), 0, 24.5, &calendar),
            Err(EditError::ExceedsDailyMax {
                date: Date::from_ymd(2024, 3, 11).unwrap(),
                hours: 24.5
            })
        );
        assert_eq!(
            propose_edit(&entry(), &week(), 7, 1.0, &calendar),
            Err(EditError::DayOutOfRange(7))
        );

        let mut entry = entry();
        entry.enabled[1] = false;
        assert_eq!(
            propose_edit(&entry, &week(), 1, 1.0, &calendar),
            Err(EditError::CellDisabled(Date::from_ymd(2024, 3, 12).unwrap()))
        );
    }
}
