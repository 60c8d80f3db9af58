//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod collect;
pub mod group;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use collect::{build_report, execute_collect, validate_args};
pub use group::execute_group;
pub use models::{CollectArgs, GroupArgs};
pub use utils::{display_version, validate_report_file};
