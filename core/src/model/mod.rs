pub mod report;
pub mod session;
pub mod time_entry;
