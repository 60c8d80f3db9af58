//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while parsing a stack dump
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to read stack dump: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: stack header has no measurement token")]
    MissingMeasurement { line: usize },

    #[error("line {line}: invalid measurement '{token}'")]
    InvalidMeasurement { line: usize, token: String },

    #[error("line {line}: frame line has no index separator")]
    MissingFrameIndex { line: usize },

    #[error("line {line}: frame line outside of any stack")]
    FrameOutsideStack { line: usize },
}

/// Errors raised when a cleaned stack cannot be named
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("stack ends in '{last}' but no frame contains '{marker}'")]
    NoProducer { last: String, marker: String },

    #[error("stack ends in '{last}' with {len} frames, need at least {offset}")]
    StackTooShort {
        last: String,
        len: usize,
        offset: usize,
    },
}

/// Errors that can occur while grouping one stack dump
#[derive(Error, Debug)]
pub enum GroupError {
    #[error("{path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ParseError,
    },

    #[error("{path}: stack #{stack_index}: {source}")]
    Classification {
        path: String,
        stack_index: usize,
        #[source]
        source: ClassificationError,
    },
}

/// Errors that can occur while extracting metrics from a log file
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: no line matches '{label}'")]
    MissingMetric { path: PathBuf, label: String },

    #[error("{path}:{line}: invalid value '{value}'")]
    InvalidValue {
        path: PathBuf,
        line: usize,
        value: String,
    },
}

/// Errors raised when an expected artifact is absent from the data store
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("missing artifact: {0}")]
    MissingArtifact(PathBuf),

    #[error("failed to list {path}: {source}")]
    Listing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while running the external analysis tools
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("failed to start {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}")]
    Failed { tool: String, status: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid command line: '{0}'")]
    InvalidCommand(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize YAML: {0}")]
    YamlFailed(#[from] serde_yaml::Error),

    #[error("Failed to serialize JSON: {0}")]
    JsonFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while loading a grouping rule file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid rule file: {0}")]
    Invalid(#[from] serde_yaml::Error),

    #[error("invalid release pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}
