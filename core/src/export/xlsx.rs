use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::info;

use crate::config::ExportConfig;
use crate::export::table::{detailed_table, summary_table, CellValue, SheetTable};
use crate::model::report::{DetailedReportRow, SummaryReportRow};
use crate::time::compact_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    TimeReport,
    Collaborators,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::TimeReport => "time_report",
            ReportType::Collaborators => "collaborators",
        }
    }
}

/// `{report-type}_{YYYYMMDD}_{YYYYMMDD}.xlsx`
pub fn export_filename(report_type: ReportType, start: NaiveDate, end: NaiveDate) -> String {
    format!("{}_{}_{}.xlsx", report_type.as_str(), compact_date(start), compact_date(end))
}

struct Formats {
    header: Format,
    text: Format,
    hours: Format,
    hours_zero: Format,
    hours_set: Format,
    total: Format,
}

/// Writes the detailed and summary tables as a two-sheet workbook.
#[derive(Debug, Clone)]
pub struct ReportExporter {
    pub dim_zero_hours: bool,
    pub day_column_width: f64,
}

impl Default for ReportExporter {
    fn default() -> Self {
        Self {
            dim_zero_hours: true,
            day_column_width: 7.0,
        }
    }
}

impl ReportExporter {
    pub fn new(dim_zero_hours: bool) -> Self {
        Self {
            dim_zero_hours,
            ..Self::default()
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            dim_zero_hours: config.dim_zero_hours,
            day_column_width: config.day_column_width,
        }
    }

    /// Encodes both sheets into an xlsx buffer. `day_columns` must be the
    /// labels the detailed rows were built with.
    pub fn render(
        &self,
        detailed: &[DetailedReportRow],
        day_columns: &[String],
        summary: &[SummaryReportRow],
    ) -> Result<Vec<u8>> {
        let formats = self.create_formats();
        let mut workbook = Workbook::new();

        workbook.push_worksheet(self.build_sheet(&detailed_table(detailed, day_columns), &formats)?);
        workbook.push_worksheet(self.build_sheet(&summary_table(summary), &formats)?);

        let buffer = workbook
            .save_to_buffer()
            .context("Failed to encode workbook")?;
        Ok(buffer)
    }

    /// Renders and writes `{dir}/{export_filename}`, returning the path.
    #[allow(clippy::too_many_arguments)]
    pub fn write_to(
        &self,
        dir: &Path,
        report_type: ReportType,
        start: NaiveDate,
        end: NaiveDate,
        detailed: &[DetailedReportRow],
        day_columns: &[String],
        summary: &[SummaryReportRow],
    ) -> Result<PathBuf> {
        let buffer = self.render(detailed, day_columns, summary)?;

        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
        let path = dir.join(export_filename(report_type, start, end));
        fs::write(&path, &buffer)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!(path = %path.display(), bytes = buffer.len(), report = report_type.as_str(), "Report exported");
        Ok(path)
    }

    fn create_formats(&self) -> Formats {
        let hours = Format::new()
            .set_num_format("0.00")
            .set_align(FormatAlign::Center)
            .set_border(FormatBorder::Thin);

        Formats {
            header: Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_background_color(0x4472C4)
                .set_font_color(0xFFFFFF)
                .set_border(FormatBorder::Thin),
            text: Format::new().set_border(FormatBorder::Thin),
            hours_zero: if self.dim_zero_hours {
                hours.clone().set_font_color(0xBFBFBF)
            } else {
                hours.clone()
            },
            hours_set: hours.clone().set_background_color(0xE2EFDA),
            total: Format::new()
                .set_bold()
                .set_num_format("0.00")
                .set_align(FormatAlign::Center)
                .set_background_color(0xFFF2CC)
                .set_border(FormatBorder::Thin),
            hours,
        }
    }

    fn build_sheet(&self, table: &SheetTable, formats: &Formats) -> Result<Worksheet> {
        let mut sheet = Worksheet::new();
        sheet.set_name(&table.name)?;

        let last_col = table.headers.len().saturating_sub(1);
        for (col, header) in table.headers.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, header, &formats.header)?;
            let width = if col < 3 { 22.0 } else if col == last_col { 10.0 } else { self.day_column_width };
            sheet.set_column_width(col as u16, width)?;
        }
        sheet.set_freeze_panes(1, 3)?;

        for (r, cells) in table.rows.iter().enumerate() {
            let row = (r + 1) as u32;
            for (col, cell) in cells.iter().enumerate() {
                let col_num = col as u16;
                match cell {
                    CellValue::Text(text) => {
                        sheet.write_string_with_format(row, col_num, text, &formats.text)?;
                    }
                    CellValue::Hours(value) => {
                        let format = if col == last_col {
                            &formats.total
                        } else if *value == 0.0 {
                            &formats.hours_zero
                        } else if table.headers.len() > 4 {
                            &formats.hours_set
                        } else {
                            &formats.hours
                        };
                        sheet.write_number_with_format(row, col_num, *value, format)?;
                    }
                }
            }
        }

        Ok(sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::time_entry::{ProjectContribution, TimeEntryRecord};
    use crate::service::detailed_report::aggregate_detailed;
    use crate::service::summary_report::aggregate_summary;
    use crate::time::{generate_day_columns, parse_iso_date};
    use uuid::Uuid;

    #[test]
    fn test_filename() {
        let start = parse_iso_date("2024-08-01").unwrap();
        let end = parse_iso_date("2024-08-31").unwrap();
        assert_eq!(export_filename(ReportType::TimeReport, start, end), "time_report_20240801_20240831.xlsx");
        assert_eq!(export_filename(ReportType::Collaborators, start, end), "collaborators_20240801_20240831.xlsx");
    }

    #[test]
    fn test_render_and_write() {
        let start = parse_iso_date("2024-08-01").unwrap();
        let end = parse_iso_date("2024-08-03").unwrap();
        let mut record = TimeEntryRecord::new("Ann", start);
        record.projects.push(ProjectContribution::new("C", "P", 2.0));
        let records = vec![record];

        let cols = generate_day_columns(start, end);
        let detailed = aggregate_detailed(&records, start, end);
        let summary = aggregate_summary(&records);

        let exporter = ReportExporter::default();
        let buffer = exporter.render(&detailed, &cols, &summary).unwrap();
        assert_eq!(&buffer[..2], b"PK");

        let dir = std::env::temp_dir().join(format!("sirme-export-{}", Uuid::new_v4()));
        let path = exporter
            .write_to(&dir, ReportType::TimeReport, start, end, &detailed, &cols, &summary)
            .unwrap();
        assert!(path.ends_with("time_report_20240801_20240803.xlsx"));
        assert!(path.exists());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_from_config() {
        let config = ExportConfig { day_column_width: 11.0, dim_zero_hours: false, ..Default::default() };
        let exporter = ReportExporter::from_config(&config);
        assert_eq!(exporter.day_column_width, 11.0);
        assert!(!exporter.dim_zero_hours);
        assert!(exporter.render(&[], &[], &[]).is_ok());
    }

    #[test]
    fn test_render_empty_report() {
        let buffer = ReportExporter::new(false).render(&[], &[], &[]).unwrap();
        assert!(!buffer.is_empty());
    }
}
