use crate::model::session::Session;
use crate::model::time_entry::TimeEntryRecord;
use anyhow::Result;
use chrono::NaiveDate;

pub trait TimeEntryRepository {
    fn list(&self) -> Result<Vec<TimeEntryRecord>>;
    /// Records dated within `start..=end`.
    fn list_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<TimeEntryRecord>>;
    /// Replaces the record for the same employee and date, or adds it.
    fn upsert(&self, record: TimeEntryRecord) -> Result<()>;
}

pub trait SessionStore {
    fn load(&self) -> Result<Option<Session>>;
    fn save(&self, session: &Session) -> Result<()>;
    fn clear(&self) -> Result<()>;
}
