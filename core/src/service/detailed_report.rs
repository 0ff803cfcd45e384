use std::collections::HashMap;
use chrono::NaiveDate;
use tracing::debug;

use crate::model::report::{unique_labels, AggregationKey, DetailedReportRow};
use crate::model::time_entry::TimeEntryRecord;
use crate::service::ordering::sort_by_resource_then_project;
use crate::time::{day_column_label, generate_day_columns};

/// Pivots records into one row per (employee, project, client) with a column
/// per day of `start..=end`.
///
/// Hours dated outside the range, or on a date with no matching column, are
/// dropped from both the day cell and the row total. Ranges longer than a year
/// repeat labels; hours for every date sharing a label land in its one cell.
pub fn aggregate_detailed(records: &[TimeEntryRecord], start: NaiveDate, end: NaiveDate) -> Vec<DetailedReportRow> {
    let day_columns = generate_day_columns(start, end);
    let labels = unique_labels(&day_columns);
    let label_index: HashMap<&str, usize> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| (label.as_str(), i))
        .collect();

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<DetailedReportRow> = Vec::new();
    let mut dropped_hours = 0.0;

    for record in records {
        if record.projects.is_empty() {
            continue;
        }
        let column = if record.date >= start && record.date <= end {
            label_index.get(day_column_label(record.date).as_str()).copied()
        } else {
            None
        };

        for project in &record.projects {
            let key = AggregationKey::new(&record.employee_name, &project.project_name, &project.client_name);
            let pos = *index.entry(key.joined()).or_insert_with(|| {
                rows.push(DetailedReportRow::with_labels(&key, &labels));
                rows.len() - 1
            });
            let row = &mut rows[pos];

            match column {
                Some(col) => {
                    row.days[col].1 += project.hours;
                    row.total += project.hours;
                }
                None => dropped_hours += project.hours,
            }
        }
    }

    if dropped_hours > 0.0 {
        debug!(dropped_hours, %start, %end, "Hours outside report range were not counted");
    }

    sort_by_resource_then_project(&mut rows, |r| (r.resource.as_str(), r.project.as_str()));
    debug!(rows = rows.len(), columns = labels.len(), "Built detailed report");
    rows
}
