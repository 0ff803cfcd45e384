use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeRole {
    Admin,
    Employee,
    Collaborator,
}

impl Default for EmployeeRole {
    fn default() -> Self {
        EmployeeRole::Employee
    }
}

impl std::str::FromStr for EmployeeRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(EmployeeRole::Admin),
            "employee" => Ok(EmployeeRole::Employee),
            "collaborator" => Ok(EmployeeRole::Collaborator),
            _ => Err(anyhow::anyhow!("Unknown role: {}", s)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProjectContribution {
    pub client_name: String,
    pub project_name: String,
    pub hours: f64,
    #[serde(default)]
    pub is_mps: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ProjectContribution {
    pub fn new(client_name: impl Into<String>, project_name: impl Into<String>, hours: f64) -> Self {
        Self {
            client_name: client_name.into(),
            project_name: project_name.into(),
            hours,
            is_mps: false,
            notes: None,
        }
    }
}

/// One employee's hours for one calendar day, split across projects.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimeEntryRecord {
    pub employee_name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub role: EmployeeRole,
    #[serde(default)]
    pub projects: Vec<ProjectContribution>,
}

impl TimeEntryRecord {
    pub fn new(employee_name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            employee_name: employee_name.into(),
            date,
            role: EmployeeRole::default(),
            projects: Vec::new(),
        }
    }

    pub fn total_hours(&self) -> f64 {
        self.projects.iter().map(|p| p.hours).sum()
    }

    pub fn mps_hours(&self) -> f64 {
        self.projects.iter().filter(|p| p.is_mps).map(|p| p.hours).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let mut record = TimeEntryRecord::new("Ann", NaiveDate::from_ymd_opt(2024, 8, 1).unwrap());
        record.projects.push(ProjectContribution::new("C", "P", 2.5));
        let mut mps = ProjectContribution::new("C", "Q", 1.25);
        mps.is_mps = true;
        record.projects.push(mps);

        assert_eq!(record.total_hours(), 3.75);
        assert_eq!(record.mps_hours(), 1.25);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("Collaborator".parse::<EmployeeRole>().unwrap(), EmployeeRole::Collaborator);
        assert!("manager".parse::<EmployeeRole>().is_err());
    }
}
