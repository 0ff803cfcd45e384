use std::collections::HashSet;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Identifies one row in both the detailed and summary tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AggregationKey {
    pub employee_name: String,
    pub project_name: String,
    pub client_name: String,
}

impl AggregationKey {
    pub fn new(employee_name: &str, project_name: &str, client_name: &str) -> Self {
        Self {
            employee_name: employee_name.to_string(),
            project_name: project_name.to_string(),
            client_name: client_name.to_string(),
        }
    }

    pub fn joined(&self) -> String {
        format!("{}|{}|{}", self.employee_name, self.project_name, self.client_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailedReportRow {
    pub resource: String,
    pub project: String,
    pub customer: String,
    /// (day label, hours), in column order. A label appears at most once.
    pub days: Vec<(String, f64)>,
    pub total: f64,
}

/// Distinct labels of `day_columns`, in first-occurrence order.
pub fn unique_labels(day_columns: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(day_columns.len());
    day_columns
        .iter()
        .filter(|label| seen.insert(label.as_str()))
        .cloned()
        .collect()
}

impl DetailedReportRow {
    pub fn new(key: &AggregationKey, day_columns: &[String]) -> Self {
        Self::with_labels(key, &unique_labels(day_columns))
    }

    /// `labels` must already be distinct.
    pub fn with_labels(key: &AggregationKey, labels: &[String]) -> Self {
        Self {
            resource: key.employee_name.clone(),
            project: key.project_name.clone(),
            customer: key.client_name.clone(),
            days: labels.iter().map(|l| (l.clone(), 0.0)).collect(),
            total: 0.0,
        }
    }

    pub fn day(&self, label: &str) -> Option<f64> {
        self.days.iter().find(|(l, _)| l == label).map(|(_, h)| *h)
    }
}

// Flattened so day labels sit next to the fixed columns, one key per column.
impl Serialize for DetailedReportRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len() + 4))?;
        map.serialize_entry("resource", &self.resource)?;
        map.serialize_entry("project", &self.project)?;
        map.serialize_entry("customer", &self.customer)?;
        for (label, hours) in &self.days {
            map.serialize_entry(label, hours)?;
        }
        map.serialize_entry("total", &self.total)?;
        map.end()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SummaryReportRow {
    pub resource: String,
    pub project: String,
    pub customer: String,
    pub total: f64,
}

impl SummaryReportRow {
    pub fn new(key: &AggregationKey) -> Self {
        Self {
            resource: key.employee_name.clone(),
            project: key.project_name.clone(),
            customer: key.client_name.clone(),
            total: 0.0,
        }
    }
}
