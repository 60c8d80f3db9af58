//! External call-graph analysis tools.
//!
//! Everything that spawns processes lives here, behind the [`Summarizer`]
//! trait, so the grouping code never deals with process management.

pub mod igprof;
pub mod types;

pub use igprof::{split_command, IgProfAnalyse, ToolConfig};
pub use types::{Metric, Summarizer, Summary};
