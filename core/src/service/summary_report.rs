use std::collections::HashMap;
use tracing::debug;

use crate::model::report::{AggregationKey, SummaryReportRow};
use crate::model::time_entry::TimeEntryRecord;
use crate::service::ordering::sort_by_resource_then_project;

/// One total per (employee, project, client). Dates are not checked.
pub fn aggregate_summary(records: &[TimeEntryRecord]) -> Vec<SummaryReportRow> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<SummaryReportRow> = Vec::new();

    for record in records {
        for project in &record.projects {
            let key = AggregationKey::new(&record.employee_name, &project.project_name, &project.client_name);
            let pos = *index.entry(key.joined()).or_insert_with(|| {
                rows.push(SummaryReportRow::new(&key));
                rows.len() - 1
            });
            rows[pos].total += project.hours;
        }
    }

    sort_by_resource_then_project(&mut rows, |r| (r.resource.as_str(), r.project.as_str()));
    debug!(rows = rows.len(), "Built summary report");
    rows
}
