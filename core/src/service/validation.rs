use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

use crate::model::time_entry::{ProjectContribution, TimeEntryRecord};
use crate::time::{parse_iso_date, today};

/// Hour thresholds. Passed to every validator that needs one.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ValidationRules {
    pub max_daily_hours: f64,
    pub max_weekly_hours: f64,
    pub min_hours_per_entry: f64,
    pub max_hours_per_entry: f64,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            max_daily_hours: 24.0,
            max_weekly_hours: 168.0,
            min_hours_per_entry: 0.25,
            max_hours_per_entry: 24.0,
        }
    }
}

// Each validator returns None when the value is acceptable, otherwise a message
// for the user.

pub fn validate_project_hours(hours: f64, rules: &ValidationRules) -> Option<String> {
    if hours.is_nan() || hours < rules.min_hours_per_entry {
        return Some(format!(
            "Hours must be at least {} per project",
            rules.min_hours_per_entry
        ));
    }
    if hours > rules.max_hours_per_entry {
        return Some(format!(
            "Hours cannot exceed {} per project",
            rules.max_hours_per_entry
        ));
    }
    None
}

pub fn validate_daily_total(projects: &[ProjectContribution], rules: &ValidationRules) -> Option<String> {
    let total: f64 = projects.iter().map(|p| p.hours).sum();
    if total > rules.max_daily_hours {
        Some(format!(
            "Total daily hours ({}) cannot exceed {}",
            total, rules.max_daily_hours
        ))
    } else {
        None
    }
}

pub fn validate_weekly_total(entries: &[TimeEntryRecord], rules: &ValidationRules) -> Option<String> {
    let total: f64 = entries.iter().map(|e| e.total_hours()).sum();
    if total > rules.max_weekly_hours {
        Some(format!(
            "Total weekly hours ({}) cannot exceed {}",
            total, rules.max_weekly_hours
        ))
    } else {
        None
    }
}

pub fn validate_employee_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Some("Employee name is required".to_string());
    }
    if trimmed.chars().count() < 2 {
        return Some("Employee name must be at least 2 characters".to_string());
    }
    None
}

pub fn validate_client_name(name: &str) -> Option<String> {
    if name.trim().is_empty() {
        Some("Client name is required".to_string())
    } else {
        None
    }
}

pub fn validate_project_name(name: &str) -> Option<String> {
    if name.trim().is_empty() {
        Some("Project name is required".to_string())
    } else {
        None
    }
}

pub fn validate_date(date: &str) -> Option<String> {
    validate_date_on(date, today())
}

/// Dates after `today` are rejected; any time on `today` itself is fine.
pub fn validate_date_on(date: &str, today: NaiveDate) -> Option<String> {
    match parse_iso_date(date) {
        Err(_) => Some("Invalid date".to_string()),
        Ok(d) if d > today => Some("Date cannot be in the future".to_string()),
        Ok(_) => None,
    }
}

/// Every check that applies to a single day's record, in form order.
pub fn validate_entry(record: &TimeEntryRecord, rules: &ValidationRules) -> Vec<String> {
    validate_entry_on(record, rules, today())
}

pub fn validate_entry_on(record: &TimeEntryRecord, rules: &ValidationRules, today: NaiveDate) -> Vec<String> {
    let mut errors = Vec::new();

    errors.extend(validate_employee_name(&record.employee_name));
    if record.date > today {
        errors.push("Date cannot be in the future".to_string());
    }
    if record.projects.is_empty() {
        errors.push("At least one project is required".to_string());
    }

    for project in &record.projects {
        errors.extend(validate_client_name(&project.client_name));
        errors.extend(validate_project_name(&project.project_name));
        errors.extend(validate_project_hours(project.hours, rules));
    }

    errors.extend(validate_daily_total(&record.projects, rules));
    errors
}
