use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::model::time_entry::TimeEntryRecord;
use crate::repository::resolve_data_dir;
use crate::repository::traits::TimeEntryRepository;
use crate::service::dto::{GraphqlResponse, TimeEntriesData, TimeEntryWire};
use crate::time::format_iso_date;

const DEFAULT_FILE_NAME: &str = "time_entries.json";

/// Time entries kept on disk in the backend's wire shape, so a GraphQL export
/// and the local store read the same way.
#[derive(Clone)]
pub struct FileTimeEntryRepository {
    file_path: PathBuf,
}

impl FileTimeEntryRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut path = resolve_data_dir(base_dir)?;
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create data directory {}", path.display()))?;
        path.push(DEFAULT_FILE_NAME);

        if !path.exists() {
            let mut writer = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(&mut writer, &Vec::<TimeEntryWire>::new())?;
            writer.flush()?;
        }

        Ok(FileTimeEntryRepository { file_path: path })
    }

    fn read_entries(&self) -> Result<Vec<TimeEntryWire>> {
        let file = File::open(&self.file_path)
            .with_context(|| format!("Failed to open {}", self.file_path.display()))?;
        let reader = BufReader::new(file);
        let entries = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse {}", self.file_path.display()))?;
        Ok(entries)
    }

    fn write_entries(&self, entries: &[TimeEntryWire]) -> Result<()> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, entries)?;
        writer.flush()?;
        Ok(())
    }

    /// Merges a GraphQL response document in one write. Returns how many
    /// records it held. A malformed document leaves the store untouched.
    pub fn import(&self, response: GraphqlResponse<TimeEntriesData>) -> Result<usize> {
        let records = response.into_records()?;
        let count = records.len();
        let mut entries = self.read_entries()?;
        for record in &records {
            merge_entry(&mut entries, record);
        }
        self.write_entries(&entries)?;
        info!(count, path = %self.file_path.display(), "Imported time entries");
        Ok(count)
    }

    pub fn import_file(&self, path: &Path) -> Result<usize> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let response: GraphqlResponse<TimeEntriesData> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("{} is not a time entries response", path.display()))?;
        self.import(response)
    }
}

impl TimeEntryRepository for FileTimeEntryRepository {
    fn list(&self) -> Result<Vec<TimeEntryRecord>> {
        let mut records = Vec::new();
        for wire in self.read_entries()? {
            let id = wire.id;
            match wire.into_record() {
                Ok(record) => records.push(record),
                Err(e) => warn!(%id, error = %e, "Skipping unreadable time entry"),
            }
        }
        Ok(records)
    }

    fn list_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<TimeEntryRecord>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|r| r.date >= start && r.date <= end)
            .collect())
    }

    fn upsert(&self, record: TimeEntryRecord) -> Result<()> {
        let mut entries = self.read_entries()?;
        merge_entry(&mut entries, &record);
        self.write_entries(&entries)
    }
}

/// Replaces the entry for the record's (employee, day), keeping its id, or
/// appends a new one.
fn merge_entry(entries: &mut Vec<TimeEntryWire>, record: &TimeEntryRecord) {
    let date = format_iso_date(record.date);
    match entries
        .iter()
        .position(|e| e.employee.name == record.employee_name && e.date == date)
    {
        Some(pos) => {
            let id = entries[pos].id;
            entries[pos] = TimeEntryWire::from_record(record, id);
        }
        None => entries.push(TimeEntryWire::from_record(record, Uuid::new_v4())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::time_entry::ProjectContribution;
    use crate::time::parse_iso_date;

    fn temp_repo() -> (FileTimeEntryRepository, PathBuf) {
        let dir = std::env::temp_dir().join(format!("sirme-test-{}", Uuid::new_v4()));
        (FileTimeEntryRepository::new(Some(dir.clone())).unwrap(), dir)
    }

    fn record(name: &str, date: &str, hours: f64) -> TimeEntryRecord {
        let mut r = TimeEntryRecord::new(name, parse_iso_date(date).unwrap());
        r.projects.push(ProjectContribution::new("C", "P", hours));
        r
    }

    #[test]
    fn test_upsert_replaces_same_day() {
        let (repo, dir) = temp_repo();
        repo.upsert(record("Ann", "2024-08-01", 2.0)).unwrap();
        repo.upsert(record("Bob", "2024-08-01", 3.0)).unwrap();
        repo.upsert(record("Ann", "2024-08-01", 5.0)).unwrap();

        let records = repo.list().unwrap();
        assert_eq!(records.len(), 2);
        let ann = records.iter().find(|r| r.employee_name == "Ann").unwrap();
        assert_eq!(ann.total_hours(), 5.0);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_list_between_is_inclusive() {
        let (repo, dir) = temp_repo();
        for date in ["2024-07-31", "2024-08-01", "2024-08-31", "2024-09-01"] {
            repo.upsert(record("Ann", date, 1.0)).unwrap();
        }
        let august = repo
            .list_between(parse_iso_date("2024-08-01").unwrap(), parse_iso_date("2024-08-31").unwrap())
            .unwrap();
        assert_eq!(august.len(), 2);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_import_response() {
        let (repo, dir) = temp_repo();
        let response: GraphqlResponse<TimeEntriesData> = serde_json::from_str(
            r#"{ "data": { "time_entries": [
                { "id": "6f1c1d0e-8a3b-4a52-9d57-3f0d8f0b2a11", "date": "2024-08-01",
                  "employee": { "name": "Ann" },
                  "projects": [{ "client_name": "C", "project_name": "P", "hours": 4 }] }
            ] } }"#,
        )
        .unwrap();

        assert_eq!(repo.import(response).unwrap(), 1);
        assert_eq!(repo.list().unwrap()[0].total_hours(), 4.0);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_import_merges_with_existing_entries() {
        let (repo, dir) = temp_repo();
        repo.upsert(record("Ann", "2024-08-01", 1.0)).unwrap();
        repo.upsert(record("Bob", "2024-08-01", 2.0)).unwrap();

        let response: GraphqlResponse<TimeEntriesData> = serde_json::from_str(
            r#"{ "data": { "time_entries": [
                { "id": "6f1c1d0e-8a3b-4a52-9d57-3f0d8f0b2a11", "date": "2024-08-01",
                  "employee": { "name": "Ann" },
                  "projects": [{ "client_name": "C", "project_name": "P", "hours": 4 }] },
                { "id": "0b7e4f7a-2d0c-4c35-8e57-5a1f3f1a9c22", "date": "2024-08-02",
                  "employee": { "name": "Ann" },
                  "projects": [{ "client_name": "C", "project_name": "P", "hours": 3 }] }
            ] } }"#,
        )
        .unwrap();

        assert_eq!(repo.import(response).unwrap(), 2);
        let records = repo.list().unwrap();
        assert_eq!(records.len(), 3);
        let total: f64 = records.iter().map(|r| r.total_hours()).sum();
        assert_eq!(total, 9.0);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_import_with_bad_entry_writes_nothing() {
        let (repo, dir) = temp_repo();
        repo.upsert(record("Ann", "2024-08-01", 1.0)).unwrap();

        let response: GraphqlResponse<TimeEntriesData> = serde_json::from_str(
            r#"{ "data": { "time_entries": [
                { "id": "6f1c1d0e-8a3b-4a52-9d57-3f0d8f0b2a11", "date": "2024-08-02",
                  "employee": { "name": "Ann" },
                  "projects": [{ "client_name": "C", "project_name": "P", "hours": 4 }] },
                { "id": "0b7e4f7a-2d0c-4c35-8e57-5a1f3f1a9c22", "date": "not-a-date",
                  "employee": { "name": "Ann" } }
            ] } }"#,
        )
        .unwrap();

        assert!(repo.import(response).is_err());
        assert_eq!(repo.list().unwrap().len(), 1);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_import_file_rejects_garbage() {
        let (repo, dir) = temp_repo();
        let path = dir.join("bad.json");
        fs::write(&path, "not json").unwrap();

        assert!(repo.import_file(&path).is_err());
        assert!(repo.list().unwrap().is_empty());

        fs::remove_dir_all(dir).unwrap();
    }
}
