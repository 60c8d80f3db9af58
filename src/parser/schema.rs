//! Data model shared by the parser, the aggregator and the report writers.
//!
//! The report schema mirrors the layout consumed by the release-validation
//! dashboards: release -> workflow -> `<step>_<metric>` plus an `arch` tag.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// One sampled call stack with its measurement
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Normalized frame names in dump order
    pub frames: Vec<String>,

    /// Bytes live or ticks attributed to this stack
    pub measurement: f64,
}

impl Sample {
    pub fn new(frames: Vec<String>, measurement: f64) -> Self {
        Self {
            frames,
            measurement,
        }
    }
}

/// Scalar metrics of one workflow step
#[derive(Debug, Clone, PartialEq)]
pub struct StepMetrics {
    /// CPU seconds per event in the event loop
    pub cpu_event: f64,

    /// Maximum RSS reported by the memory service
    pub peak_rss: f64,

    /// Size of the step's output ROOT file in bytes
    pub file_size: u64,
}

impl StepMetrics {
    /// Flatten into `<step>_<metric>` entries of a workflow record
    pub fn into_entries(self, step: &str) -> Vec<(String, MetricValue)> {
        vec![
            (format!("{}_cpu_event", step), MetricValue::Value(self.cpu_event)),
            (format!("{}_peak_rss", step), MetricValue::Value(self.peak_rss)),
            (format!("{}_file_size", step), MetricValue::Bytes(self.file_size)),
        ]
    }
}

/// A single report value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Bytes(u64),
    Value(f64),
}

impl MetricValue {
    pub fn as_f64(&self) -> f64 {
        match *self {
            MetricValue::Bytes(b) => b as f64,
            MetricValue::Value(v) => v,
        }
    }
}

/// Metrics of one workflow, keyed by `<step>_<metric>`
pub type WorkflowMetrics = BTreeMap<String, MetricValue>;

const ARCH_KEY: &str = "arch";

/// All workflows of one release
///
/// Serialized as a single map with `arch` sorted among the workflow keys.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReleaseEntry {
    /// SCRAM architecture the artifacts were read from
    pub arch: String,

    /// Workflow key (dots replaced by `p`) to its metrics
    #[serde(flatten)]
    pub workflows: BTreeMap<String, WorkflowMetrics>,
}

impl Serialize for ReleaseEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.workflows.len() + 1))?;
        let mut arch_written = false;

        for (key, metrics) in &self.workflows {
            if !arch_written && key.as_str() > ARCH_KEY {
                map.serialize_entry(ARCH_KEY, &self.arch)?;
                arch_written = true;
            }
            map.serialize_entry(key, metrics)?;
        }
        if !arch_written {
            map.serialize_entry(ARCH_KEY, &self.arch)?;
        }

        map.end()
    }
}

/// Consolidated report: release name to its entry
pub type Report = BTreeMap<String, ReleaseEntry>;

/// Report key of a workflow directory (`11634.0` -> `11634p0`)
pub fn workflow_key(workflow: &str) -> String {
    workflow.replace('.', "p")
}
