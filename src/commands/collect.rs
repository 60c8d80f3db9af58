//! Collect command implementation.
//!
//! The collect command:
//! 1. Selects releases from the profiling data store
//! 2. Reads CPU/event and peak RSS from each step log
//! 3. Summarizes the raw IgProf dumps and groups their stacks
//! 4. Writes the consolidated report

use super::models::CollectArgs;
use crate::aggregator::{group_stack_dump, GroupingConfig};
use crate::output::{write_grouped, write_report};
use crate::parser::{read_log_metrics, workflow_key, ReleaseEntry, Report, StepMetrics, WorkflowMetrics};
use crate::profiler::{IgProfAnalyse, Metric, Summarizer};
use crate::store::{summary_dir, ProfileStore, StepArtifacts};
use crate::utils::glob::GlobPattern;
use anyhow::{Context, Result};
use log::{debug, error, info};
use std::time::Instant;

/// Execute the collect command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Missing artifacts (logs, ROOT files, raw dumps)
/// * `igprof-analyse` or pipeline failures
/// * Unparsable logs or stack dumps
/// * Report write errors
pub fn execute_collect(args: CollectArgs) -> Result<Report> {
    let start_time = Instant::now();

    validate_args(&args)?;

    let grouping = GroupingConfig::load(args.rules.as_deref())
        .context("Failed to load grouping rules")?;

    let igprof = IgProfAnalyse::new(args.tools.clone());
    let summarizer: Option<&dyn Summarizer> = if args.skip_profiles {
        info!("Profiler summaries disabled");
        None
    } else {
        Some(&igprof)
    };

    let report = build_report(&args, &grouping, summarizer)?;

    write_report(&report, &args.outfile, args.format)
        .with_context(|| format!("Failed to write report to {}", args.outfile.display()))?;

    info!("✓ Report written to: {}", args.outfile.display());
    info!("Collect completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(report)
}

/// Walk the data store and build the report
///
/// **Public** - separated from `execute_collect` so any summarizer can be plugged in
pub fn build_report(
    args: &CollectArgs,
    grouping: &GroupingConfig,
    summarizer: Option<&dyn Summarizer>,
) -> Result<Report> {
    let store = ProfileStore::new(&args.profile_data);
    let pattern = GlobPattern::new(&args.release_pattern)?;

    let releases = store
        .releases(&pattern)
        .with_context(|| format!("Failed to list releases in {}", store.root().display()))?;
    info!("Found {} matching releases", releases.len());

    let mut report = Report::new();
    for release in releases {
        info!(
            "Parsing {} {} {}",
            store.root().display(),
            release,
            args.scram_arch
        );
        let entry = collect_release(&store, &release, args, grouping, summarizer)?;
        report.insert(release, entry);
    }

    Ok(report)
}

/// Collect every workflow of one release
///
/// **Private** - internal helper for build_report
fn collect_release(
    store: &ProfileStore,
    release: &str,
    args: &CollectArgs,
    grouping: &GroupingConfig,
    summarizer: Option<&dyn Summarizer>,
) -> Result<ReleaseEntry> {
    let workflows = store
        .workflows(release, &args.scram_arch)
        .with_context(|| format!("Failed to list workflows of {}", release))?;

    let mut entry = ReleaseEntry {
        arch: args.scram_arch.clone(),
        ..Default::default()
    };

    for workflow in workflows {
        match collect_workflow(store, release, &workflow, args, grouping, summarizer) {
            Ok(metrics) => {
                entry.workflows.insert(workflow_key(&workflow), metrics);
            }
            Err(e) if args.keep_going => {
                error!("Skipping workflow {} of {}: {:#}", workflow, release, e);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(entry)
}

/// Collect all configured steps of one workflow
///
/// **Private** - internal helper for collect_release
fn collect_workflow(
    store: &ProfileStore,
    release: &str,
    workflow: &str,
    args: &CollectArgs,
    grouping: &GroupingConfig,
    summarizer: Option<&dyn Summarizer>,
) -> Result<WorkflowMetrics> {
    let mut metrics = WorkflowMetrics::new();

    for step in &args.steps {
        let step_metrics = collect_step(store, release, workflow, step, args, grouping, summarizer)
            .with_context(|| format!("{} {} {}", release, workflow, step))?;
        metrics.extend(step_metrics.into_entries(step));
    }

    Ok(metrics)
}

/// Read metrics of one step and summarize its profiles
///
/// **Private** - internal helper for collect_workflow
fn collect_step(
    store: &ProfileStore,
    release: &str,
    workflow: &str,
    step: &str,
    args: &CollectArgs,
    grouping: &GroupingConfig,
    summarizer: Option<&dyn Summarizer>,
) -> Result<StepMetrics> {
    let workflow_dir = store.workflow_dir(release, &args.scram_arch, workflow);
    let artifacts = StepArtifacts::locate(&workflow_dir, step)?;

    let log_metrics = read_log_metrics(&artifacts.timing_log)?;
    let file_size = std::fs::metadata(&artifacts.root_file)
        .with_context(|| format!("Failed to stat {}", artifacts.root_file.display()))?
        .len();

    debug!(
        "{} {} {}: cpu/event {:.4}, peak RSS {:.1}, file size {}",
        release, workflow, step, log_metrics.cpu_event, log_metrics.peak_rss, file_size
    );

    if let Some(summarizer) = summarizer {
        let out_dir = summary_dir(&args.results_dir, release, workflow, step);
        for metric in Metric::ALL {
            let raw_dump = artifacts.raw_dump(metric)?;
            let summary = summarizer
                .summarize(raw_dump, metric, &out_dir)
                .with_context(|| format!("Failed to summarize {}", raw_dump.display()))?;

            let outcome = group_stack_dump(&summary.top_report, grouping, args.policy)?;
            write_grouped(&outcome.totals, out_dir.join(metric.grouped_name()))?;
        }
    }

    Ok(StepMetrics {
        cpu_event: log_metrics.cpu_event,
        peak_rss: log_metrics.peak_rss,
        file_size,
    })
}

/// Validate collect arguments
///
/// **Public** - can be called before execute_collect for early validation
pub fn validate_args(args: &CollectArgs) -> Result<()> {
    if !args.profile_data.is_dir() {
        anyhow::bail!(
            "Profile data directory does not exist: {}",
            args.profile_data.display()
        );
    }

    if args.scram_arch.is_empty() {
        anyhow::bail!("SCRAM architecture cannot be empty");
    }

    if args.release_pattern.is_empty() {
        anyhow::bail!("Release pattern cannot be empty");
    }

    if args.steps.is_empty() || args.steps.iter().any(|s| s.is_empty()) {
        anyhow::bail!("At least one non-empty step name is required");
    }

    if !args.skip_profiles && args.tools.top_n == 0 {
        anyhow::bail!("top must be greater than 0");
    }

    Ok(())
}
