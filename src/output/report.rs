//! Consolidated report writer.
//!
//! Writes the release -> workflow -> metrics map as YAML (default) or JSON.

use crate::parser::schema::Report;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Serialization format of the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Yaml,
    Json,
}

impl ReportFormat {
    /// Guess the format from a file extension, defaulting to YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => ReportFormat::Json,
            _ => ReportFormat::Yaml,
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(ReportFormat::Yaml),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("unknown report format '{}' (expected yaml or json)", s)),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Yaml => f.write_str("yaml"),
            ReportFormat::Json => f.write_str("json"),
        }
    }
}

/// Write the report to a file
///
/// **Public** - main entry point for report output
///
/// # Arguments
/// * `report` - Release -> workflow -> metrics map
/// * `output_path` - Destination file; missing parent directories are created
/// * `format` - YAML or JSON
///
/// # Returns
/// Ok if the file was written successfully
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::YamlFailed` / `JsonFailed` - serialization error
/// * `OutputError::InvalidPath` - path is empty, a directory, or its parent cannot be created
///
/// # Example
/// ```ignore
/// let report = build_report(&args, &GroupingConfig::default(), None)?;
/// write_report(&report, "out.yaml", ReportFormat::Yaml)?;
/// ```
pub fn write_report(
    report: &Report,
    output_path: impl AsRef<Path>,
    format: ReportFormat,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing {} report to: {}", format, output_path.display());

    let mut writer = BufWriter::new(create_output_file(output_path)?);

    match format {
        ReportFormat::Yaml => serde_yaml::to_writer(&mut writer, report)?,
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, report)?;
            writer.write_all(b"\n")?;
        }
    }
    writer.flush()?;

    info!(
        "Report written successfully ({} releases, {} bytes)",
        report.len(),
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Read a report back, picking the format from the extension
///
/// **Public** - used by the validate command and tests
///
/// # Arguments
/// * `input_path` - `.json` files are read as JSON, anything else as YAML
///
/// # Returns
/// The deserialized report
///
/// # Errors
/// * `OutputError::WriteFailed` - the file cannot be opened
/// * `OutputError::YamlFailed` / `JsonFailed` - the content is not a report
///
/// # Example
/// ```ignore
/// let report = read_report("out.yaml")?;
/// println!("{} releases", report.len());
/// ```
pub fn read_report(input_path: impl AsRef<Path>) -> Result<Report, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path)?;
    let report: Report = match ReportFormat::from_path(input_path) {
        ReportFormat::Yaml => serde_yaml::from_reader(file)?,
        ReportFormat::Json => serde_json::from_reader(file)?,
    };

    debug!("Report loaded: {} releases", report.len());

    Ok(report)
}

/// Validate the path and create the file, including missing parent directories
///
/// **Public** - shared by every writer in this module
pub fn create_output_file(output_path: &Path) -> Result<File, OutputError> {
    validate_output_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(File::create(output_path)?)
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
