pub mod config;
pub mod export;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use config::Config;
pub use export::{export_filename, ReportExporter, ReportType};
pub use input::{parse_entry, EntryInput};
pub use model::report::{AggregationKey, DetailedReportRow, SummaryReportRow};
pub use model::session::{Session, SessionUser};
pub use model::time_entry::{EmployeeRole, ProjectContribution, TimeEntryRecord};
pub use repository::{FileSessionStore, FileTimeEntryRepository, SessionStore, TimeEntryRepository};
pub use service::detailed_report::aggregate_detailed;
pub use service::summary_report::aggregate_summary;
pub use service::validation::ValidationRules;
pub use usecase::log_entry::{LogEntryUseCase, LogOutcome};
pub use usecase::report::{ReportBundle, ReportUseCase};
