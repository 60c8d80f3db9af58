//! Scalar metrics from `<step>_TimeMemoryInfo.log` files.
//!
//! Two values are extracted:
//! - CPU time per event from the `TimeReport` summary line
//! - peak RSS, the maximum over all `SimpleMemoryCheck` lines mentioning RSS

use crate::utils::config::{CPU_EVENT_LABEL, RSS_COLUMN, RSS_LABEL};
use crate::utils::error::MetricsError;
use log::debug;
use std::path::Path;

/// CPU/event and peak RSS of one step log
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogMetrics {
    pub cpu_event: f64,
    pub peak_rss: f64,
}

/// Read a step log and extract both metrics
pub fn read_log_metrics(path: impl AsRef<Path>) -> Result<LogMetrics, MetricsError> {
    let path = path.as_ref();
    debug!("Reading timing log: {}", path.display());

    let bytes = std::fs::read(path).map_err(|source| MetricsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8_lossy(&bytes);

    Ok(LogMetrics {
        cpu_event: cpu_event(&content, path)?,
        peak_rss: peak_rss(&content, path)?,
    })
}

/// CPU seconds per event from the first `TimeReport` line
pub fn cpu_event(content: &str, path: &Path) -> Result<f64, MetricsError> {
    let (line_no, line) = content
        .lines()
        .enumerate()
        .find(|(_, line)| line.contains(CPU_EVENT_LABEL))
        .ok_or_else(|| MetricsError::MissingMetric {
            path: path.to_path_buf(),
            label: CPU_EVENT_LABEL.to_string(),
        })?;

    let value = line.split('=').nth(1).unwrap_or("").trim();
    value.parse::<f64>().map_err(|_| MetricsError::InvalidValue {
        path: path.to_path_buf(),
        line: line_no + 1,
        value: value.to_string(),
    })
}

/// Maximum RSS over every line mentioning RSS
pub fn peak_rss(content: &str, path: &Path) -> Result<f64, MetricsError> {
    let mut peak: Option<f64> = None;

    for (line_no, line) in content.lines().enumerate() {
        if !line.contains(RSS_LABEL) {
            continue;
        }

        let token = line.split_whitespace().nth(RSS_COLUMN).unwrap_or("");
        let rss = token.parse::<f64>().map_err(|_| MetricsError::InvalidValue {
            path: path.to_path_buf(),
            line: line_no + 1,
            value: token.to_string(),
        })?;

        peak = Some(peak.map_or(rss, |p| p.max(rss)));
    }

    peak.ok_or_else(|| MetricsError::MissingMetric {
        path: path.to_path_buf(),
        label: RSS_LABEL.to_string(),
    })
}
