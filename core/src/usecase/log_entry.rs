use anyhow::Result;
use tracing::{info, warn};

use crate::input::EntryInput;
use crate::model::session::Session;
use crate::model::time_entry::TimeEntryRecord;
use crate::repository::TimeEntryRepository;
use crate::service::validation::{validate_entry, validate_weekly_total, ValidationRules};
use crate::time::{week_end, week_start};

#[derive(Debug, Clone, PartialEq)]
pub enum LogOutcome {
    Saved(TimeEntryRecord),
    Rejected(Vec<String>),
}

/// Adds one contribution to the signed-in user's day. Nothing is written
/// unless the merged day and its week pass validation.
pub struct LogEntryUseCase<'a, R: TimeEntryRepository> {
    repo: &'a R,
    rules: &'a ValidationRules,
}

impl<'a, R: TimeEntryRepository> LogEntryUseCase<'a, R> {
    pub fn new(repo: &'a R, rules: &'a ValidationRules) -> Self {
        Self { repo, rules }
    }

    pub fn log(&self, session: &Session, input: EntryInput) -> Result<LogOutcome> {
        let start = week_start(input.date);
        let end = week_end(input.date);
        let mut week = self.repo.list_between(start, end)?;
        week.retain(|r| r.employee_name == session.user.name);

        let mut day = match week.iter().position(|r| r.date == input.date) {
            Some(pos) => week.remove(pos),
            None => TimeEntryRecord::new(session.user.name.clone(), input.date),
        };
        day.role = session.user.role;
        day.projects.push(input.contribution);

        let mut errors = validate_entry(&day, self.rules);
        week.push(day.clone());
        errors.extend(validate_weekly_total(&week, self.rules));

        if !errors.is_empty() {
            warn!(user = %session.user.name, date = %day.date, errors = errors.len(), "Entry rejected");
            return Ok(LogOutcome::Rejected(errors));
        }

        self.repo.upsert(day.clone())?;
        info!(user = %session.user.name, date = %day.date, hours = day.total_hours(), "Entry saved");
        Ok(LogOutcome::Saved(day))
    }
}
