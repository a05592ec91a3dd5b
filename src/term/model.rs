use std::path::{Path, PathBuf};

use periods::edit::{EditError, Proposal, WorkCalendar, propose_edit};
use periods::session::{Action, SessionContext};
use periods::sheet::{Status, TimeEntry, Timesheet};
use periods::verify::{MAX_COMMENT_CHARS, Mode};
use tracing::info;

use crate::config::Config;
use crate::store;

/// The open document together with everything needed to decide on edits.
pub struct Model {
    path: PathBuf,
    sheet: Timesheet,
    calendar: WorkCalendar,
    session: SessionContext,
    dirty: bool,
}

impl Model {
    pub fn load(path: PathBuf, config: &Config) -> std::io::Result<Self> {
        let sheet = config
            .calculator()
            .and_then(|calculator| store::load(&path, &calculator))
            .map_err(|e| std::io::Error::other(format!("{e:#}")))?;
        Ok(Self {
            path,
            sheet,
            calendar: config.calendar(),
            session: config.session(),
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet(&self) -> &Timesheet {
        &self.sheet
    }

    pub fn calendar(&self) -> &WorkCalendar {
        &self.calendar
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn can_edit(&self) -> bool {
        self.session.can(Action::Edit, self.sheet.status)
    }

    /// `None` if there is no such row.
    pub fn propose(&self, row: usize, day: usize, hours: f64) -> Option<Result<Proposal, EditError>> {
        let entry = self.sheet.entries.get(row)?;
        Some(propose_edit(
            entry,
            &self.sheet.period(),
            day,
            hours,
            &self.calendar,
        ))
    }

    pub fn replace(&mut self, row: usize, entry: TimeEntry) {
        if let Some(slot) = self.sheet.entries.get_mut(row)
            && *slot != entry
        {
            *slot = entry;
            self.dirty = true;
        }
    }

    pub fn set_comment(&mut self, row: usize, day: usize, comment: String) -> Result<(), String> {
        let Some(entry) = self.sheet.entries.get_mut(row) else {
            return Err("No entry selected".to_owned());
        };
        if !entry.is_enabled(day) {
            return Err("This cell cannot be edited".to_owned());
        }
        if comment.chars().count() > MAX_COMMENT_CHARS {
            return Err(format!(
                "Comments are limited to {MAX_COMMENT_CHARS} characters"
            ));
        }
        if let Some(slot) = entry.comments.get_mut(day)
            && *slot != comment
        {
            *slot = comment;
            self.dirty = true;
        }
        Ok(())
    }

    pub fn save(&mut self) -> Result<(), String> {
        self.sheet.validate(Mode::Save).map_err(|e| e.to_string())?;
        self.write()
    }

    pub fn submit(&mut self) -> Result<(), String> {
        self.session
            .require(Action::Submit, self.sheet.status)
            .map_err(|e| e.to_string())?;
        self.sheet.validate(Mode::Submit).map_err(|e| e.to_string())?;
        let previous = self.sheet.status;
        self.sheet.status = Status::PendingApproval;
        if let Err(e) = self.write() {
            self.sheet.status = previous;
            return Err(e);
        }
        info!(user = %self.session.user, "submitted timesheet");
        Ok(())
    }

    fn write(&mut self) -> Result<(), String> {
        store::save(&self.path, &self.sheet).map_err(|e| format!("{e:#}"))?;
        self.dirty = false;
        Ok(())
    }
}
