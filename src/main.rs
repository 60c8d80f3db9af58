//! CMSSW Profiling Digest CLI
//!
//! Collects per-release profiling metrics into a single report and
//! groups IgProf call stacks into named categories.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use cmssw_profiling_digest::aggregator::UnclassifiedPolicy;
use cmssw_profiling_digest::commands::{
    display_version, execute_collect, execute_group, validate_report_file, CollectArgs, GroupArgs,
};
use cmssw_profiling_digest::output::ReportFormat;
use cmssw_profiling_digest::profiler::ToolConfig;
use cmssw_profiling_digest::utils::config::{
    DEFAULT_IGPROF_ANALYSE, DEFAULT_OUTFILE, DEFAULT_PROFILE_DATA, DEFAULT_RELEASE_PATTERN,
    DEFAULT_RESULTS_DIR, DEFAULT_SCRAM_ARCH, DEFAULT_SQLITE3, DEFAULT_SQL_FIXUP, DEFAULT_TOP_N,
};

/// CMSSW Profiling Digest - release validation profiling summaries
#[derive(Parser, Debug)]
#[command(name = "cmssw-profiling-digest")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Walk the profiling data store and write the consolidated report
    Collect {
        /// Profiling data location
        #[arg(long, env = "PROFILE_DATA", default_value = DEFAULT_PROFILE_DATA)]
        profile_data: PathBuf,

        /// Look for profile files in this SCRAM arch directory
        #[arg(long, env = "SCRAM_ARCH", default_value = DEFAULT_SCRAM_ARCH)]
        scram_arch: String,

        /// Glob filtering the releases that are processed
        #[arg(long, default_value = DEFAULT_RELEASE_PATTERN)]
        release_pattern: String,

        /// Output report file
        #[arg(short, long, default_value = DEFAULT_OUTFILE)]
        outfile: PathBuf,

        /// Report format (yaml or json); guessed from the extension if omitted
        #[arg(long)]
        format: Option<ReportFormat>,

        /// Directory receiving the IgProf summaries
        #[arg(long, default_value = DEFAULT_RESULTS_DIR)]
        results_dir: PathBuf,

        /// Comma-separated steps to read for every workflow
        #[arg(long, value_delimiter = ',', default_values_t = vec!["step3".to_string(), "step4".to_string()])]
        steps: Vec<String>,

        /// Only collect log metrics, do not run igprof-analyse
        #[arg(long)]
        skip_profiles: bool,

        /// Do not build the SQLite exports
        #[arg(long)]
        skip_sql: bool,

        /// Log failing workflows and continue
        #[arg(long)]
        keep_going: bool,

        /// Policy for stacks the rules cannot name: abort, skip or other
        #[arg(long, default_value = "skip")]
        on_unclassified: UnclassifiedPolicy,

        /// YAML file replacing the built-in grouping rules
        #[arg(long)]
        rules: Option<PathBuf>,

        /// igprof-analyse executable
        #[arg(long, env = "IGPROF_ANALYSE", default_value = DEFAULT_IGPROF_ANALYSE)]
        igprof_analyse: String,

        /// Command filtering the SQL export before it reaches sqlite3
        #[arg(long, default_value = DEFAULT_SQL_FIXUP)]
        sql_fixup: String,

        /// sqlite3 executable
        #[arg(long, default_value = DEFAULT_SQLITE3)]
        sqlite3: String,

        /// Number of stacks kept in each top report
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top: usize,
    },

    /// Group the stacks of one top report into categories
    Group {
        /// Top report (plain text, .bz2 or .gz)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// YAML file replacing the built-in grouping rules
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Policy for stacks the rules cannot name: abort, skip or other
        #[arg(long, default_value = "skip")]
        on_unclassified: UnclassifiedPolicy,
    },

    /// Validate a report file
    Validate {
        /// Path to the report (YAML or JSON)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Collect {
            profile_data,
            scram_arch,
            release_pattern,
            outfile,
            format,
            results_dir,
            steps,
            skip_profiles,
            skip_sql,
            keep_going,
            on_unclassified,
            rules,
            igprof_analyse,
            sql_fixup,
            sqlite3,
            top,
        } => {
            let format = format.unwrap_or_else(|| ReportFormat::from_path(&outfile));

            let args = CollectArgs {
                profile_data,
                scram_arch,
                release_pattern,
                outfile,
                format,
                results_dir,
                steps,
                skip_profiles,
                keep_going,
                policy: on_unclassified,
                rules,
                tools: ToolConfig {
                    analyse: igprof_analyse,
                    sql_fixup,
                    sqlite3,
                    top_n: top,
                    structured_export: !skip_sql,
                },
            };

            execute_collect(args)?;
        }

        Commands::Group {
            input,
            output,
            rules,
            on_unclassified,
        } => {
            execute_group(GroupArgs {
                input,
                output,
                rules,
                policy: on_unclassified,
            })?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
