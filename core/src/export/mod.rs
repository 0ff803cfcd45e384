pub mod table;
pub mod xlsx;

pub use table::{collaborator_records, detailed_table, summary_table, CellValue, SheetTable};
pub use xlsx::{export_filename, ReportExporter, ReportType};
