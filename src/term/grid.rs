use std::iter::{once, repeat};

use periods::edit::{PendingEdit, Proposal};
use periods::hours::{format_hours, parse_hours};
use periods::summary::Summary;
use ratatui::buffer::Buffer;
use ratatui::crossterm::event::{Event, KeyCode};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, Paragraph, Row, Table, Widget};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::term::model::Model;
use crate::term::style::{
    BORDER, DATE, DAY_OFF, DISABLED, DRAFT, HIGHLIGHT, PROJECT, SCALED, TIME,
};
use crate::term::{Control, Popup, UnknownCommand, View};

const CELL: u16 = 8;

/// Entries by days of the period. Typing into a cell keeps a draft until
/// `Enter`, values that need a second look wait in `pending` for `y` or `n`.
pub struct Grid {
    model: Model,
    row: usize,
    col: usize,
    draft: Option<Input>,
    pending: Option<PendingEdit>,
    notice: Option<String>,
}

impl Grid {
    pub fn new(model: Model) -> Self {
        Self {
            model,
            row: 0,
            col: 0,
            draft: None,
            pending: None,
            notice: None,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn reload(&mut self, model: Model) {
        self.model = model;
        self.draft = None;
        self.pending = None;
        self.row = self.row.min(self.rows().saturating_sub(1));
        self.col = self.col.min(self.cols().saturating_sub(1));
        self.notice = Some("Reloaded".to_owned());
    }

    pub fn save(&mut self) -> Option<Control> {
        match self.model.save() {
            Ok(()) => {
                self.notice = Some(format!("Saved {}", self.model.path().display()));
                None
            }
            Err(e) => Some(Control::Alert(e)),
        }
    }

    pub fn submit(&mut self) -> Option<Control> {
        match self.model.submit() {
            Ok(()) => {
                self.notice = Some("Submitted for approval".to_owned());
                None
            }
            Err(e) => Some(Control::Alert(e)),
        }
    }

    fn rows(&self) -> usize {
        self.model.sheet().entries.len()
    }

    fn cols(&self) -> usize {
        self.model.sheet().period().len
    }

    fn move_by(&mut self, rows: isize, cols: isize) {
        let clamp = |value: usize, delta: isize, len: usize| {
            value
                .saturating_add_signed(delta)
                .min(len.saturating_sub(1))
        };
        self.row = clamp(self.row, rows, self.rows());
        self.col = clamp(self.col, cols, self.cols());
    }

    fn check_editable(&self) -> Result<(), String> {
        if !self.model.can_edit() {
            return Err(format!(
                "A timesheet that is {} cannot be edited",
                self.model.sheet().status
            ));
        }
        let Some(entry) = self.model.sheet().entries.get(self.row) else {
            return Err("There are no entries to edit".to_owned());
        };
        if !entry.is_enabled(self.col) {
            return Err("Hours cannot be entered in this cell".to_owned());
        }
        Ok(())
    }

    fn begin_draft(&mut self, first: Option<char>) -> Option<Control> {
        if let Err(e) = self.check_editable() {
            return Some(Control::Alert(e));
        }
        let value = match first {
            Some(c) => c.to_string(),
            None => self
                .model
                .sheet()
                .entries
                .get(self.row)
                .and_then(|e| e.hours.get(self.col))
                .map(|&h| format_hours(h))
                .unwrap_or_default(),
        };
        self.draft = Some(Input::new(value));
        None
    }

    fn commit(&mut self, hours: f64) -> Option<Control> {
        match self.model.propose(self.row, self.col, hours)? {
            Ok(Proposal::Committed(entry)) => {
                self.model.replace(self.row, entry);
                self.move_by(0, 1);
                None
            }
            Ok(Proposal::Pending(pending)) => {
                self.pending = Some(pending);
                None
            }
            Err(e) => Some(Control::Alert(e.to_string())),
        }
    }

    fn resolve(&mut self, keep: bool) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        self.col = pending.day();
        let entry = if keep {
            self.notice = Some(format!(
                "Kept {} on {}",
                format_hours(pending.hours()),
                pending.date()
            ));
            pending.confirm()
        } else {
            pending.discard()
        };
        self.model.replace(self.row, entry);
        if keep {
            self.move_by(0, 1);
        }
    }

    fn handle_pending(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => self.resolve(true),
            KeyCode::Char('n' | 'N') | KeyCode::Esc => self.resolve(false),
            _ => {}
        }
    }

    fn handle_draft(&mut self, event: &Event, code: KeyCode) -> Option<Control> {
        match code {
            KeyCode::Enter => {
                let draft = self.draft.take()?;
                self.commit(parse_hours(draft.value()))
            }
            KeyCode::Esc => {
                self.draft = None;
                None
            }
            _ => {
                if let Some(draft) = self.draft.as_mut() {
                    draft.handle_event(event);
                }
                None
            }
        }
    }

    fn cell_text(&self, row: usize, col: usize) -> (String, Style) {
        let selected = row == self.row && col == self.col;
        if selected && let Some(draft) = &self.draft {
            return (format!("{}_", draft.value()), DRAFT);
        }
        let Some(entry) = self.model.sheet().entries.get(row) else {
            return (String::new(), Style::new());
        };
        let (text, style) = match entry.hours.get(col) {
            Some(_) if !entry.is_enabled(col) => ("-".to_owned(), DISABLED),
            Some(&hours) if hours != 0.0 => (format_hours(hours), TIME),
            Some(_) => (format_hours(0.0), DAY_OFF),
            None => ("?".to_owned(), DISABLED),
        };
        (text, if selected { HIGHLIGHT } else { style })
    }

    fn render_table(&self, area: Rect, buf: &mut Buffer) {
        let sheet = self.model.sheet();
        let days = sheet.days();
        let summary = Summary::new(sheet);
        let right = |text: String| Line::from(text).alignment(Alignment::Right);

        let header = Row::new(
            once(Cell::from(""))
                .chain(days.iter().map(|&date| {
                    let weekday = date.weekday().to_string();
                    let text = format!("{} {:0>2}/{:0>2}", &weekday[..2], date.month(), date.day());
                    let style = if self.model.calendar().is_day_off(date) {
                        DAY_OFF
                    } else {
                        DATE
                    };
                    Cell::from(right(text)).style(style)
                }))
                .chain(once(Cell::from(right("Total".to_owned())))),
        );

        let rows = sheet.entries.iter().enumerate().map(|(row, entry)| {
            let cells = (0..days.len()).map(|col| {
                let (text, style) = self.cell_text(row, col);
                Cell::from(right(text)).style(style)
            });
            let total = summary.entry_recorded(row).into_duration().to_string();
            Row::new(
                once(Cell::from(entry.label()).style(PROJECT))
                    .chain(cells)
                    .chain(once(Cell::from(right(total)))),
            )
        });

        let footer = Row::new(
            once(Cell::from("Total"))
                .chain(summary.days.iter().map(|day| {
                    let shown = day.shown().into_duration();
                    if day.is_scaled() {
                        Cell::from(right(format!("{shown}*"))).style(SCALED)
                    } else {
                        Cell::from(right(shown.to_string()))
                    }
                }))
                .chain(once(Cell::from(right(
                    summary.total().into_duration().to_string(),
                )))),
        );

        let label = sheet
            .entries
            .iter()
            .map(|e| e.label().chars().count())
            .max()
            .unwrap_or_default()
            .max("Total".len());
        let widths = once(Constraint::Length(u16::try_from(label).unwrap_or(u16::MAX)))
            .chain(repeat(Constraint::Length(CELL)).take(days.len()))
            .chain(once(Constraint::Length(CELL)));

        let mut title = vec![
            Span::from(format!(" {} {} ", sheet.frequency, sheet.period())).style(DATE),
            Span::from(format!("{} ", sheet.status)),
        ];
        if !self.model.can_edit() {
            title.push(Span::from("read-only ").style(DAY_OFF));
        }
        if self.model.is_dirty() {
            title.push(Span::from("[+] "));
        }
        let block = Block::bordered()
            .title(Line::from(title))
            .border_style(BORDER);

        Table::new(rows, widths)
            .header(header)
            .footer(footer)
            .column_spacing(1)
            .block(block)
            .render(area, buf);
    }

    fn status_line(&self) -> Line<'_> {
        if let Some(notice) = &self.notice {
            return Line::from(notice.as_str());
        }
        let days = self.model.sheet().days();
        let Some(&date) = days.get(self.col) else {
            return Line::default();
        };
        let mut spans = vec![Span::from(format!("{} {date}", date.weekday())).style(DATE)];
        if self.model.calendar().is_holiday(date) {
            spans.push(Span::from(" holiday").style(DAY_OFF));
        }
        if let Some(comment) = self
            .model
            .sheet()
            .entries
            .get(self.row)
            .and_then(|e| e.comments.get(self.col))
            .filter(|c| !c.is_empty())
        {
            spans.push(Span::from(format!("  {comment}")));
        }
        Line::from(spans)
    }
}

impl View for Grid {
    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let [table_area, status_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
        self.render_table(table_area, buf);
        Paragraph::new(self.status_line()).render(status_area, buf);

        if let Some(pending) = &self.pending {
            let text = format!(
                "{}\nThe cell holds {} until then.",
                pending.prompt(),
                format_hours(pending.previous())
            );
            Popup::new(" Confirm ", text, " [y] Keep  [n] Discard ").draw(area, buf);
        }
    }

    fn handle_event(&mut self, event: Event) -> Option<Control> {
        let Event::Key(key) = event else {
            return None;
        };
        if !key.is_press() {
            return None;
        }
        self.notice = None;
        if self.pending.is_some() {
            self.handle_pending(key.code);
            return None;
        }
        if self.draft.is_some() {
            return self.handle_draft(&event, key.code);
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_by(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_by(1, 0),
            KeyCode::Left | KeyCode::Char('h') => self.move_by(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_by(0, 1),
            KeyCode::Home => self.col = 0,
            KeyCode::End => self.col = self.cols().saturating_sub(1),
            KeyCode::Enter => return self.begin_draft(None),
            KeyCode::Char(c @ ('0'..='9' | '.' | ',' | '-')) => return self.begin_draft(Some(c)),
            KeyCode::Delete | KeyCode::Backspace => {
                if let Err(e) = self.check_editable() {
                    return Some(Control::Alert(e));
                }
                return self.commit(0.0);
            }
            KeyCode::Char('e') => return Some(Control::Edit),
            _ => {}
        }
        None
    }

    fn command(&mut self, command: &str, args: &[&str]) -> Result<Option<Control>, UnknownCommand> {
        match command {
            "comment" => {
                let result = self
                    .check_editable()
                    .and_then(|()| self.model.set_comment(self.row, self.col, args.join(" ")));
                Ok(result.err().map(Control::Alert))
            }
            "day" => {
                let found = args
                    .first()
                    .and_then(|day| day.parse::<u32>().ok())
                    .and_then(|day| {
                        self.model
                            .sheet()
                            .days()
                            .iter()
                            .position(|date| date.day() == day)
                    });
                match found {
                    Some(col) => {
                        self.col = col;
                        Ok(None)
                    }
                    None => Ok(Some(Control::Alert(format!(
                        "No such day in this period: {}",
                        args.join(" ")
                    )))),
                }
            }
            _ => Err(UnknownCommand),
        }
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use tempfile::NamedTempFile;

    use crate::config::Config;
    use crate::term::grid::Grid;
    use crate::term::model::Model;
    use crate::term::{Control, View};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(grid: &mut Grid, text: &str) -> Option<Control> {
        text.chars()
            .map(KeyCode::Char)
            .chain(Some(KeyCode::Enter))
            .filter_map(|code| grid.handle_event(key(code)))
            .last()
    }

    // Mon 03/11/2024 - Sun 03/17/2024, one entry
    fn grid() -> (NamedTempFile, Grid) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"{
                "frequency": "WEEKLY",
                "period_start": "03/11/2024",
                "entries": [
                    { "project": "ACME", "task": "Design", "hours": [0, 0, 0, 0, 0, 0, 0] }
                ]
            }"#,
        )
        .unwrap();
        let model = Model::load(file.path().to_path_buf(), &Config::default()).unwrap();
        (file, Grid::new(model))
    }

    fn hours(grid: &Grid) -> Vec<f64> {
        grid.model().sheet().entries[0].hours.clone()
    }

    #[test]
    fn test_ordinary_edit_commits() {
        let (_file, mut grid) = grid();
        assert!(type_text(&mut grid, "7:30").is_none());
        assert_eq!(hours(&grid)[0], 7.5);
        assert!(grid.model().is_dirty());
        assert_eq!(grid.col, 1);
    }

    #[test]
    fn test_weekend_edit_waits_for_confirmation() {
        let (_file, mut grid) = grid();
        grid.col = 5;
        assert!(type_text(&mut grid, "2").is_none());
        assert!(grid.pending.is_some());
        assert_eq!(hours(&grid)[5], 0.0);

        // navigation is blocked while a confirmation is open
        assert!(grid.handle_event(key(KeyCode::Left)).is_none());
        assert_eq!(grid.col, 5);

        assert!(grid.handle_event(key(KeyCode::Char('n'))).is_none());
        assert!(grid.pending.is_none());
        assert_eq!(hours(&grid)[5], 0.0);

        type_text(&mut grid, "2");
        assert!(grid.handle_event(key(KeyCode::Char('y'))).is_none());
        assert_eq!(hours(&grid)[5], 2.0);
        assert_eq!(grid.notice.as_deref(), Some("Kept 2:00 on 03/16/2024"));
        assert_eq!(grid.col, 6);
    }

    #[test]
    fn test_more_than_a_day_alerts_and_clears_draft() {
        let (_file, mut grid) = grid();
        let Some(Control::Alert(message)) = type_text(&mut grid, "25") else {
            panic!("expected an alert");
        };
        assert_eq!(message, "25:00 hours on 03/11/2024 is more than a day has");
        assert!(grid.draft.is_none());
        assert!(grid.pending.is_none());
        assert_eq!(hours(&grid)[0], 0.0);
    }

    #[test]
    fn test_save_and_reload() {
        let (file, mut grid) = grid();
        type_text(&mut grid, "8");
        assert!(grid.save().is_none());
        assert!(!grid.model().is_dirty());

        let model = Model::load(file.path().to_path_buf(), &Config::default()).unwrap();
        assert_eq!(model.sheet().entries[0].hours[0], 8.0);
    }

    #[test]
    fn test_submit_locks_editing() {
        let (_file, mut grid) = grid();
        assert!(matches!(grid.submit(), Some(Control::Alert(_))));

        type_text(&mut grid, "8");
        assert!(grid.submit().is_none());
        assert!(!grid.model().can_edit());
        assert!(matches!(
            grid.handle_event(key(KeyCode::Enter)),
            Some(Control::Alert(_))
        ));
    }

    #[test]
    fn test_commands() {
        let (_file, mut grid) = grid();
        assert!(grid.command("day", &["14"]).unwrap().is_none());
        assert_eq!(grid.col, 3);
        assert!(grid.command("comment", &["client", "call"]).unwrap().is_none());
        assert_eq!(grid.model().sheet().entries[0].comments[3], "client call");
        assert!(matches!(
            grid.command("day", &["1"]),
            Ok(Some(Control::Alert(_)))
        ));
        assert!(grid.command("bogus", &[]).is_err());
    }
}
