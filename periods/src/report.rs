use std::fmt::{Display, Formatter, Result};

use anstyle::{AnsiColor, Color, Style};

use crate::edit::WorkCalendar;
use crate::hours::format_hours;
use crate::sheet::Timesheet;
use crate::summary::Summary;
use crate::Date;

const DATE: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightYellow)));
const PROJECT: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightGreen)));
const TIME: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightMagenta)));
const SCALED: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));
const ADDITIONS: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack)));

const CELL: usize = 7;

/// Grid of a timesheet followed by its per day totals.
pub struct Output<'a> {
    sheet: &'a Timesheet,
    summary: Summary,
    calendar: Option<&'a WorkCalendar>,
    color: bool,
}

impl<'a> Output<'a> {
    #[must_use]
    pub fn new(sheet: &'a Timesheet) -> Self {
        Self {
            sheet,
            summary: Summary::new(sheet),
            calendar: None,
            color: true,
        }
    }

    #[must_use]
    pub fn with_calendar(mut self, calendar: &'a WorkCalendar) -> Self {
        self.calendar = Some(calendar);
        self
    }

    #[must_use]
    pub fn plain(mut self) -> Self {
        self.color = false;
        self
    }

    fn style(&self, style: Style) -> Style {
        if self.color {
            style
        } else {
            Style::new()
        }
    }

    fn is_day_off(&self, date: Date) -> bool {
        self.calendar.map_or_else(
            || crate::date::is_weekend(date),
            |calendar| calendar.is_day_off(date),
        )
    }

    fn cell(&self, f: &mut Formatter<'_>, style: Style, text: &str) -> Result {
        let style = self.style(style);
        write!(
            f,
            "{}{text:>width$}{}",
            style.render(),
            style.render_reset(),
            width = CELL
        )
    }

    fn label_width(&self) -> usize {
        self.sheet
            .entries
            .iter()
            .map(|e| e.label().chars().count())
            .max()
            .unwrap_or_default()
            .max("Total".len())
    }

    fn header(&self, f: &mut Formatter<'_>, width: usize, days: &[Date]) -> Result {
        let date = self.style(DATE);
        writeln!(
            f,
            "{}* {} {}{} ({})",
            date.render(),
            self.sheet.frequency,
            self.sheet.period(),
            date.render_reset(),
            self.sheet.status
        )?;

        write!(f, "{:width$}", "")?;
        for &day in days {
            let style = if self.is_day_off(day) { ADDITIONS } else { DATE };
            let text = format!("{:0>2}/{:0>2}", day.month(), day.day());
            self.cell(f, style, &text)?;
        }
        self.cell(f, Style::new(), "Total")?;
        writeln!(f)?;

        write!(f, "{:width$}", "")?;
        for &day in days {
            let weekday = day.weekday().to_string();
            self.cell(f, ADDITIONS, &weekday[..2])?;
        }
        writeln!(f)
    }
}

impl Display for Output<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let days = self.sheet.days();
        let width = self.label_width();
        self.header(f, width, &days)?;

        for (index, entry) in self.sheet.entries.iter().enumerate() {
            let project = self.style(PROJECT);
            write!(
                f,
                "{}{:<width$}{}",
                project.render(),
                entry.label(),
                project.render_reset()
            )?;
            for day in 0..days.len() {
                match entry.hours.get(day) {
                    Some(_) if !entry.is_enabled(day) => self.cell(f, ADDITIONS, "-")?,
                    Some(&hours) if hours != 0.0 => self.cell(f, TIME, &format_hours(hours))?,
                    Some(_) => self.cell(f, ADDITIONS, &format_hours(0.0))?,
                    None => self.cell(f, ADDITIONS, "?")?,
                }
            }
            let total = self.summary.entry_recorded(index).into_duration();
            self.cell(f, Style::new(), &total.to_string())?;
            writeln!(f)?;
        }

        write!(f, "{:<width$}", "Total")?;
        for day in &self.summary.days {
            let shown = day.shown().into_duration();
            if day.is_scaled() {
                self.cell(f, SCALED, &format!("{shown}*"))?;
            } else {
                self.cell(f, Style::new(), &shown.to_string())?;
            }
        }
        self.cell(f, Style::new(), &self.summary.total().into_duration().to_string())?;
        writeln!(f)?;

        if self.summary.any_scaled() {
            let additions = self.style(ADDITIONS);
            writeln!(
                f,
                "{}* more than 24:00 recorded, shown scaled to the day{}",
                additions.render(),
                additions.render_reset()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::edit::WorkCalendar;
    use crate::period::{Frequency, PeriodCalculator};
    use crate::report::Output;
    use crate::sheet::Timesheet;
    use crate::Date;

    fn sheet() -> Timesheet {
        let period = PeriodCalculator::default()
            .period(Frequency::Weekly, Date::from_ymd(2024, 3, 13).unwrap());
        let mut sheet = Timesheet::new(period);
        let index = sheet.add_entry("ACME", "Design");
        sheet.entries[index].hours[..2].copy_from_slice(&[8.0, 7.5]);
        sheet
    }

    #[test]
    fn test_plain_output() {
        let sheet = sheet();
        let output = Output::new(&sheet).plain().to_string();
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "* WEEKLY 03/11/2024 - 03/17/2024 (DRAFT)");
        assert_eq!(
            lines[1],
            "               03/11  03/12  03/13  03/14  03/15  03/16  03/17  Total"
        );
        assert_eq!(
            lines[2],
            "                  Mo     Tu     We     Th     Fr     Sa     Su"
        );
        assert_eq!(
            lines[3],
            "ACME / Design   8:00   7:30   0:00   0:00   0:00   0:00   0:00  15:30"
        );
        assert_eq!(
            lines[4],
            "Total           8:00   7:30   0:00   0:00   0:00   0:00   0:00  15:30"
        );
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_scaled_and_disabled_cells() {
        let mut sheet = sheet();
        sheet.entries[0].enabled[6] = false;
        let index = sheet.add_entry("ACME", "Review");
        sheet.entries[index].hours[0] = 24.0;
        let calendar = WorkCalendar::default();
        let output = Output::new(&sheet)
            .with_calendar(&calendar)
            .plain()
            .to_string();
        let lines = output.lines().collect::<Vec<_>>();
        // the row keeps what was recorded, the scaled day only shows in the footer
        assert!(lines[3].ends_with("      -  15:30"), "{}", lines[3]);
        assert!(lines[4].ends_with("  24:00"), "{}", lines[4]);
        assert!(lines[5].starts_with("Total         24:00*"), "{}", lines[5]);
        assert_eq!(
            lines[6],
            "* more than 24:00 recorded, shown scaled to the day"
        );
    }

    #[test]
    fn test_colored_output_contains_escapes() {
        let sheet = sheet();
        let output = Output::new(&sheet).to_string();
        assert!(output.contains("\u{1b}["));
    }
}
