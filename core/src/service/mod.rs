pub mod detailed_report;
pub mod dto;
pub mod ordering;
pub mod period_stats;
pub mod summary_report;
pub mod validation;
