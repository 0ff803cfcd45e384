//! Wire shapes returned by the time-tracking GraphQL backend, and their
//! mapping into the domain model. Anything that does not map cleanly is
//! rejected here rather than deeper in the aggregators.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::model::time_entry::{EmployeeRole, ProjectContribution, TimeEntryRecord};
use crate::time::{format_iso_date, parse_iso_date};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("GraphQL request failed: {0}")]
    Remote(String),
    #[error("Response carried no data")]
    MissingData,
    #[error("Entry {id}: invalid date '{value}'")]
    InvalidDate { id: Uuid, value: String },
    #[error("Entry {id}: invalid hours {hours} for project '{project}'")]
    InvalidHours { id: Uuid, project: String, hours: f64 },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GraphqlError {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphqlError>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimeEntriesData {
    pub time_entries: Vec<TimeEntryWire>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EmployeeWire {
    pub name: String,
    #[serde(default)]
    pub role: EmployeeRole,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProjectWire {
    pub client_name: String,
    pub project_name: String,
    pub hours: f64,
    #[serde(default)]
    pub is_mps: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimeEntryWire {
    pub id: Uuid,
    pub date: String, // YYYY-MM-DD
    pub employee: EmployeeWire,
    #[serde(default)]
    pub projects: Option<Vec<ProjectWire>>,
}

impl TimeEntryWire {
    pub fn into_record(self) -> Result<TimeEntryRecord, SchemaError> {
        let date = parse_iso_date(&self.date).map_err(|_| SchemaError::InvalidDate {
            id: self.id,
            value: self.date.clone(),
        })?;

        let mut projects = Vec::new();
        for p in self.projects.unwrap_or_default() {
            if !p.hours.is_finite() || p.hours < 0.0 {
                return Err(SchemaError::InvalidHours {
                    id: self.id,
                    project: p.project_name,
                    hours: p.hours,
                });
            }
            projects.push(ProjectContribution {
                client_name: p.client_name,
                project_name: p.project_name,
                hours: p.hours,
                is_mps: p.is_mps,
                notes: p.notes.filter(|n| !n.trim().is_empty()),
            });
        }

        Ok(TimeEntryRecord {
            employee_name: self.employee.name,
            date,
            role: self.employee.role,
            projects,
        })
    }

    pub fn from_record(record: &TimeEntryRecord, id: Uuid) -> Self {
        Self {
            id,
            date: format_iso_date(record.date),
            employee: EmployeeWire {
                name: record.employee_name.clone(),
                role: record.role,
            },
            projects: Some(
                record
                    .projects
                    .iter()
                    .map(|p| ProjectWire {
                        client_name: p.client_name.clone(),
                        project_name: p.project_name.clone(),
                        hours: p.hours,
                        is_mps: p.is_mps,
                        notes: p.notes.clone(),
                    })
                    .collect(),
            ),
        }
    }
}

impl GraphqlResponse<TimeEntriesData> {
    pub fn into_records(self) -> Result<Vec<TimeEntryRecord>, SchemaError> {
        if let Some(errors) = self.errors.filter(|e| !e.is_empty()) {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(SchemaError::Remote(messages.join("; ")));
        }
        let data = self.data.ok_or(SchemaError::MissingData)?;
        data.time_entries.into_iter().map(TimeEntryWire::into_record).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "data": {
            "time_entries": [
                {
                    "id": "6f1c1d0e-8a3b-4a52-9d57-3f0d8f0b2a11",
                    "date": "2024-08-01",
                    "employee": { "name": "Ann", "role": "collaborator" },
                    "projects": [
                        { "client_name": "C", "project_name": "P", "hours": 2.5, "is_mps": true, "notes": "" }
                    ]
                },
                {
                    "id": "0b6a8d57-1c2e-4f3a-8e7d-2a9b1c0d4e55",
                    "date": "2024-08-02",
                    "employee": { "name": "Bob" },
                    "projects": null
                }
            ]
        }
    }"#;

    #[test]
    fn test_maps_response() {
        let response: GraphqlResponse<TimeEntriesData> = serde_json::from_str(RESPONSE).unwrap();
        let records = response.into_records().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].role, EmployeeRole::Collaborator);
        assert_eq!(records[0].projects[0].hours, 2.5);
        assert!(records[0].projects[0].is_mps);
        assert_eq!(records[0].projects[0].notes, None);
        assert_eq!(records[1].role, EmployeeRole::Employee);
        assert!(records[1].projects.is_empty());
    }

    #[test]
    fn test_remote_errors_win() {
        let response: GraphqlResponse<TimeEntriesData> = serde_json::from_str(
            r#"{ "data": null, "errors": [{ "message": "permission denied" }] }"#,
        )
        .unwrap();
        assert_eq!(
            response.into_records(),
            Err(SchemaError::Remote("permission denied".to_string()))
        );
    }

    #[test]
    fn test_missing_data() {
        let response: GraphqlResponse<TimeEntriesData> = serde_json::from_str(r#"{ "data": null }"#).unwrap();
        assert_eq!(response.into_records(), Err(SchemaError::MissingData));
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut wire = TimeEntryWire {
            id: Uuid::new_v4(),
            date: "2024-13-01".to_string(),
            employee: EmployeeWire { name: "Ann".to_string(), role: EmployeeRole::Employee },
            projects: None,
        };
        assert!(matches!(wire.clone().into_record(), Err(SchemaError::InvalidDate { .. })));

        wire.date = "2024-08-01".to_string();
        wire.projects = Some(vec![ProjectWire {
            client_name: "C".to_string(),
            project_name: "P".to_string(),
            hours: -1.0,
            is_mps: false,
            notes: None,
        }]);
        assert!(matches!(wire.into_record(), Err(SchemaError::InvalidHours { .. })));
    }

    #[test]
    fn test_from_record() {
        let mut record = TimeEntryRecord::new("Ann", parse_iso_date("2024-08-01").unwrap());
        record.projects.push(ProjectContribution::new("C", "P", 1.5));
        let id = Uuid::new_v4();
        let wire = TimeEntryWire::from_record(&record, id);
        assert_eq!(wire.id, id);
        assert_eq!(wire.date, "2024-08-01");
        assert_eq!(wire.into_record().unwrap(), record);
    }
}
