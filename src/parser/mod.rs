//! Input parsing and shared data model.
//!
//! This module handles:
//! - Reading IgProf top reports into stack samples
//! - Extracting timing and memory metrics from step logs
//! - Defining the report schema

pub mod schema;
pub mod stack_dump;
pub mod timing_log;

// Re-export main types
pub use schema::{
    workflow_key, MetricValue, ReleaseEntry, Report, Sample, StepMetrics, WorkflowMetrics,
};
pub use stack_dump::{normalize_frame, open_stack_dump, parse_samples, SampleReader};
pub use timing_log::{read_log_metrics, LogMetrics};
