//! Types shared by profiler summarizers.

use crate::utils::error::ToolError;
use std::fmt;
use std::path::{Path, PathBuf};

/// Which IgProf counter to rank stacks by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// CPU ticks (`PERF_TICKS`)
    Cpu,
    /// Live memory (`MEM_LIVE`)
    Mem,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Cpu, Metric::Mem];

    /// IgProf counter name passed to `-r`
    pub fn counter(&self) -> &'static str {
        match self {
            Metric::Cpu => "PERF_TICKS",
            Metric::Mem => "MEM_LIVE",
        }
    }

    /// File stem of every output derived from this metric
    pub fn stem(&self) -> &'static str {
        match self {
            Metric::Cpu => "cpu",
            Metric::Mem => "mem",
        }
    }

    /// Raw dump written by the harness for a step
    pub fn raw_dump_name(&self, step: &str) -> String {
        match self {
            Metric::Cpu => format!("{}_igprofCPU.gz", step),
            Metric::Mem => format!("{}_igprofMEM.gz", step),
        }
    }

    pub fn top_report_name(&self) -> String {
        format!("{}.txt.bz2", self.stem())
    }

    pub fn export_name(&self) -> String {
        format!("{}.sql3", self.stem())
    }

    pub fn grouped_name(&self) -> String {
        format!("{}_grouped.csv", self.stem())
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.counter())
    }
}

/// Files produced by summarizing one raw dump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Compressed top-N text report
    pub top_report: PathBuf,

    /// SQLite export, when enabled
    pub structured_export: Option<PathBuf>,
}

/// Turns a raw call-graph dump into a top report and a structured export
pub trait Summarizer {
    fn summarize(
        &self,
        raw_dump: &Path,
        metric: Metric,
        out_dir: &Path,
    ) -> Result<Summary, ToolError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert_eq!(Metric::Cpu.counter(), "PERF_TICKS");
        assert_eq!(Metric::Mem.counter(), "MEM_LIVE");
        assert_eq!(Metric::Cpu.raw_dump_name("step3"), "step3_igprofCPU.gz");
        assert_eq!(Metric::Mem.top_report_name(), "mem.txt.bz2");
        assert_eq!(Metric::Mem.grouped_name(), "mem_grouped.csv");
        assert_eq!(Metric::Cpu.export_name(), "cpu.sql3");
    }
}
