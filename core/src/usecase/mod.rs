pub mod log_entry;
pub mod report;
