use std::path::{Path, PathBuf};
use anyhow::Result;
use chrono::NaiveDate;
use tracing::info;

use crate::export::{collaborator_records, ReportExporter, ReportType};
use crate::model::report::{DetailedReportRow, SummaryReportRow};
use crate::repository::TimeEntryRepository;
use crate::service::detailed_report::aggregate_detailed;
use crate::service::summary_report::aggregate_summary;
use crate::time::generate_day_columns;

/// Everything one export needs, computed from a single fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportBundle {
    pub report_type: ReportType,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub day_columns: Vec<String>,
    pub detailed: Vec<DetailedReportRow>,
    pub summary: Vec<SummaryReportRow>,
}

pub struct ReportUseCase<'a, R: TimeEntryRepository> {
    repo: &'a R,
}

impl<'a, R: TimeEntryRepository> ReportUseCase<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    pub fn build(&self, report_type: ReportType, start: NaiveDate, end: NaiveDate) -> Result<ReportBundle> {
        let mut records = self.repo.list_between(start, end)?;
        if report_type == ReportType::Collaborators {
            records = collaborator_records(&records);
        }
        info!(records = records.len(), report = report_type.as_str(), %start, %end, "Building report");

        Ok(ReportBundle {
            report_type,
            start,
            end,
            day_columns: generate_day_columns(start, end),
            detailed: aggregate_detailed(&records, start, end),
            summary: aggregate_summary(&records),
        })
    }

    pub fn export(
        &self,
        exporter: &ReportExporter,
        dir: &Path,
        report_type: ReportType,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PathBuf> {
        let bundle = self.build(report_type, start, end)?;
        exporter.write_to(
            dir,
            report_type,
            start,
            end,
            &bundle.detailed,
            &bundle.day_columns,
            &bundle.summary,
        )
    }
}
