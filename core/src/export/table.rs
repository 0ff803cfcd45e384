use std::collections::HashMap;

use crate::model::report::{unique_labels, DetailedReportRow, SummaryReportRow};
use crate::model::time_entry::{EmployeeRole, TimeEntryRecord};

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Hours(f64),
}

/// Row and column shape of one worksheet, independent of the file encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

const KEY_HEADERS: [&str; 3] = ["Resource", "Project", "Customer"];

fn key_cells(resource: &str, project: &str, customer: &str) -> Vec<CellValue> {
    vec![
        CellValue::Text(resource.to_string()),
        CellValue::Text(project.to_string()),
        CellValue::Text(customer.to_string()),
    ]
}

/// Columns: the key, one per distinct day label in `day_columns`, then Total.
pub fn detailed_table(rows: &[DetailedReportRow], day_columns: &[String]) -> SheetTable {
    let labels = unique_labels(day_columns);
    let position: HashMap<&str, usize> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| (label.as_str(), i))
        .collect();

    let mut headers: Vec<String> = KEY_HEADERS.iter().map(|h| h.to_string()).collect();
    headers.extend(labels.iter().cloned());
    headers.push("Total".to_string());

    let rows = rows
        .iter()
        .map(|row| {
            let mut cells = key_cells(&row.resource, &row.project, &row.customer);
            let mut hours = vec![0.0; labels.len()];
            for (label, h) in &row.days {
                if let Some(&i) = position.get(label.as_str()) {
                    hours[i] = *h;
                }
            }
            cells.extend(hours.into_iter().map(CellValue::Hours));
            cells.push(CellValue::Hours(row.total));
            cells
        })
        .collect();

    SheetTable { name: "Detailed".to_string(), headers, rows }
}

pub fn summary_table(rows: &[SummaryReportRow]) -> SheetTable {
    let mut headers: Vec<String> = KEY_HEADERS.iter().map(|h| h.to_string()).collect();
    headers.push("Total".to_string());

    let rows = rows
        .iter()
        .map(|row| {
            let mut cells = key_cells(&row.resource, &row.project, &row.customer);
            cells.push(CellValue::Hours(row.total));
            cells
        })
        .collect();

    SheetTable { name: "Summary".to_string(), headers, rows }
}

/// Records that belong in the collaborators export.
pub fn collaborator_records(records: &[TimeEntryRecord]) -> Vec<TimeEntryRecord> {
    records
        .iter()
        .filter(|r| r.role == EmployeeRole::Collaborator)
        .cloned()
        .collect()
}
