use thiserror::Error;
use tracing::debug;

use crate::sheet::TimeEntry;
use crate::Date;

pub const MAX_DAILY_HOURS: f64 = 24.0;
pub const MAX_COMMENT_CHARS: usize = 250;

/// Slack for summing decimal hours, far below a second.
const HOURS_EPSILON: f64 = 1e-9;

/// Whether `hours`, for one entry or summed over a day, is more than a day has.
#[must_use]
pub fn exceeds_day(hours: f64) -> bool {
    hours > MAX_DAILY_HOURS + HOURS_EPSILON
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Mode {
    /// Store a draft.
    Save,
    /// Hand the period in for approval.
    Submit,
}

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ValidationError {
    #[error("Entry {entry} covers {found} days, but the period has {expected}")]
    Misaligned {
        entry: usize,
        expected: usize,
        found: usize,
    },
    #[error("Hours on {date} cannot be negative")]
    NegativeHours { entry: usize, day: usize, date: Date },
    #[error("Hours on {date} cannot exceed 24 for a single entry")]
    ExceedsDailyMax { entry: usize, day: usize, date: Date },
    #[error("Hours on {date} must be a number")]
    NonNumericHours { entry: usize, day: usize, date: Date },
    #[error("Total hours on {date} cannot exceed 24")]
    CombinedExceedsDailyMax { day: usize, date: Date },
    #[error("Comment on {date} is longer than 250 characters")]
    CommentTooLong { entry: usize, day: usize, date: Date },
    #[error("No hours entered, add at least one hour before submitting")]
    NoHoursEntered,
}

/// Runs the save or submit checks over a period and reports the first failure.
///
/// Checks run in this order: per cell bounds, per day totals, comment
/// lengths and, when submitting, that any hours were entered at all.
pub fn validate(entries: &[TimeEntry], days: &[Date], mode: Mode) -> Result<(), ValidationError> {
    let result = check(entries, days, mode);
    if let Err(error) = &result {
        debug!(?mode, %error, "timesheet failed validation");
    }
    result
}

fn check(entries: &[TimeEntry], days: &[Date], mode: Mode) -> Result<(), ValidationError> {
    for (entry, row) in entries.iter().enumerate() {
        if row.hours.len() != days.len() {
            return Err(ValidationError::Misaligned {
                entry,
                expected: days.len(),
                found: row.hours.len(),
            });
        }
    }

    for (entry, row) in entries.iter().enumerate() {
        for (day, (&hours, &date)) in row.hours.iter().zip(days).enumerate() {
            if hours < 0.0 {
                return Err(ValidationError::NegativeHours { entry, day, date });
            }
            if exceeds_day(hours) {
                return Err(ValidationError::ExceedsDailyMax { entry, day, date });
            }
            if !hours.is_finite() {
                return Err(ValidationError::NonNumericHours { entry, day, date });
            }
        }
    }

    for (day, &date) in days.iter().enumerate() {
        let total = entries.iter().map(|row| row.hours[day]).sum::<f64>();
        if exceeds_day(total) {
            return Err(ValidationError::CombinedExceedsDailyMax { day, date });
        }
    }

    for (entry, row) in entries.iter().enumerate() {
        for (day, (comment, &date)) in row.comments.iter().zip(days).enumerate() {
            if comment.chars().count() > MAX_COMMENT_CHARS {
                return Err(ValidationError::CommentTooLong { entry, day, date });
            }
        }
    }

    if mode == Mode::Submit {
        let cells = || entries.iter().flat_map(|row| row.hours.iter().copied());
        let total = cells().sum::<f64>();
        if total <= 0.0 || !cells().any(|hours| hours > 0.0) {
            return Err(ValidationError::NoHoursEntered);
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use crate::date::enumerate_days;
    use crate::sheet::TimeEntry;
    use crate::verify::{validate, Mode, ValidationError};
    use crate::Date;

    fn days(count: usize) -> Vec<Date> {
        enumerate_days(Date::from_ymd(2024, 1, 1).unwrap(), count)
    }

    fn entry(hours: &[f64]) -> TimeEntry {
        TimeEntry {
            hours: hours.to_vec(),
            ..TimeEntry::new("ACME", "Design", hours.len())
        }
    }

    #[test]
    fn test_fails_fast_on_first_cell() {
        let days = days(2);
        assert_eq!(
            validate(&[entry(&[-1.0, 5.0])], &days, Mode::Save),
            Err(ValidationError::NegativeHours {
                entry: 0,
                day: 0,
                date: days[0]
            })
        );
        // the negative cell is reported even though a later day is over the limit
        assert_eq!(
            validate(&[entry(&[-1.0, 30.0])], &days, Mode::Save),
            Err(ValidationError::NegativeHours {
                entry: 0,
                day: 0,
                date: days[0]
            })
        );
    }

    #[test]
    fn test_cell_bounds() {
        let days = days(3);
        let tests = [
            (
                [0.0, 24.5, 0.0],
                ValidationError::ExceedsDailyMax {
                    entry: 0,
                    day: 1,
                    date: days[1],
                },
            ),
            (
                [0.0, 0.0, f64::NAN],
                ValidationError::NonNumericHours {
                    entry: 0,
                    day: 2,
                    date: days[2],
                },
            ),
            (
                [f64::INFINITY, 0.0, 0.0],
                ValidationError::ExceedsDailyMax {
                    entry: 0,
                    day: 0,
                    date: days[0],
                },
            ),
        ];
        for (hours, expected) in tests {
            assert_eq!(
                validate(&[entry(&hours)], &days, Mode::Save),
                Err(expected)
            );
        }
        assert_eq!(validate(&[entry(&[24.0, 0.0, 0.0])], &days, Mode::Save), Ok(()));
    }

    #[test]
    fn test_combined_daily_max() {
        let days = days(2);
        let entries = [entry(&[12.0, 8.0]), entry(&[12.5, 8.0])];
        assert_eq!(
            validate(&entries, &days, Mode::Save),
            Err(ValidationError::CombinedExceedsDailyMax {
                day: 0,
                date: days[0]
            })
        );
        let entries = [entry(&[8.1, 0.0]), entry(&[8.1, 0.0]), entry(&[7.8, 0.0])];
        assert_eq!(validate(&entries, &days, Mode::Save), Ok(()));
    }

    #[test]
    fn test_combined_and_single_limits_agree() {
        let days = days(1);
        assert_eq!(
            validate(&[entry(&[24.004])], &days, Mode::Save),
            Err(ValidationError::ExceedsDailyMax {
                entry: 0,
                day: 0,
                date: days[0]
            })
        );
        // under half a minute over the day, split across two entries
        assert_eq!(
            validate(&[entry(&[12.004]), entry(&[12.004])], &days, Mode::Save),
            Err(ValidationError::CombinedExceedsDailyMax {
                day: 0,
                date: days[0]
            })
        );
        assert_eq!(
            validate(&[entry(&[12.0]), entry(&[12.0])], &days, Mode::Save),
            Ok(())
        );
    }

    #[test]
    fn test_comment_length() {
        let days = days(2);
        let mut row = entry(&[1.0, 0.0]);
        row.comments[1] = "ä".repeat(250);
        assert_eq!(validate(&[row.clone()], &days, Mode::Save), Ok(()));
        row.comments[1].push('x');
        assert_eq!(
            validate(&[row], &days, Mode::Save),
            Err(ValidationError::CommentTooLong {
                entry: 0,
                day: 1,
                date: days[1]
            })
        );
    }

    #[test]
    fn test_submit_requires_hours() {
        let days = days(2);
        let entries = [entry(&[0.0, 0.0]), entry(&[0.0, 0.0])];
        assert_eq!(validate(&entries, &days, Mode::Save), Ok(()));
        assert_eq!(
            validate(&entries, &days, Mode::Submit),
            Err(ValidationError::NoHoursEntered)
        );
        assert_eq!(
            validate(&[], &days, Mode::Submit),
            Err(ValidationError::NoHoursEntered)
        );
        assert_eq!(
            validate(&[entry(&[0.0, 0.25])], &days, Mode::Submit),
            Ok(())
        );
    }

    #[test]
    fn test_misaligned_entry() {
        assert_eq!(
            validate(&[entry(&[1.0])], &days(2), Mode::Save),
            Err(ValidationError::Misaligned {
                entry: 0,
                expected: 2,
                found: 1
            })
        );
    }
}
