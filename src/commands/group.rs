//! Group command implementation.
//!
//! Runs the stack grouping on a single top report, outside of a data store
//! walk. Useful to re-group existing summaries with a different rule file.

use super::models::GroupArgs;
use crate::aggregator::{group_stack_dump, CategoryTotals, GroupingConfig};
use crate::output::{write_grouped, write_grouped_to};
use anyhow::{Context, Result};
use log::info;
use std::io::Write;

/// Execute the group command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Input report, optional output file, rule file and policy
///
/// # Returns
/// The category totals that were written
///
/// # Errors
/// * Input report missing or unreadable
/// * Invalid rule file
/// * Unnamed stack under the `abort` policy
/// * Output write errors
///
/// # Example
/// ```ignore
/// let totals = execute_group(GroupArgs {
///     input: "results/igprof/12_0_0/11634.0/step3/cpu.txt.bz2".into(),
///     output: Some("cpu_grouped.csv".into()),
///     ..Default::default()
/// })?;
/// ```
pub fn execute_group(args: GroupArgs) -> Result<CategoryTotals> {
    if !args.input.is_file() {
        anyhow::bail!("Input report does not exist: {}", args.input.display());
    }

    let grouping = GroupingConfig::load(args.rules.as_deref())
        .context("Failed to load grouping rules")?;

    info!("Grouping stacks of {}", args.input.display());
    let outcome = group_stack_dump(&args.input, &grouping, args.policy)?;

    info!(
        "{} samples, {} categories, {} empty, {} unclassified",
        outcome.samples,
        outcome.totals.len(),
        outcome.empty,
        outcome.unclassified
    );

    match &args.output {
        Some(path) => {
            write_grouped(&outcome.totals, path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("✓ Grouped totals written to: {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            write_grouped_to(&outcome.totals, &mut handle)?;
            handle.flush()?;
        }
    }

    Ok(outcome.totals)
}
