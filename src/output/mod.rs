//! Output writers for reports and grouped totals.
//!
//! This module handles writing data to disk in various formats:
//! - Consolidated release report (YAML or JSON)
//! - Grouped category totals (`name;total` lines)

pub mod grouped;
pub mod report;

// Re-export main functions
pub use grouped::{write_grouped, write_grouped_to};
pub use report::{read_report, write_report, ReportFormat};
