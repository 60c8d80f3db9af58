//! Utility modules for configuration and error handling.

pub mod config;
pub mod error;
pub mod glob;

// Re-export commonly used error types for convenience
pub use error::{
    ArtifactError, ClassificationError, ConfigError, GroupError, MetricsError, OutputError,
    ParseError, ToolError,
};
pub use glob::GlobPattern;
