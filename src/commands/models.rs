use crate::aggregator::UnclassifiedPolicy;
use crate::output::ReportFormat;
use crate::profiler::ToolConfig;
use crate::utils::config::{
    DEFAULT_OUTFILE, DEFAULT_PROFILE_DATA, DEFAULT_RELEASE_PATTERN, DEFAULT_RESULTS_DIR,
    DEFAULT_SCRAM_ARCH, DEFAULT_STEPS,
};
use std::path::PathBuf;

/// Arguments for the collect command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct CollectArgs {
    /// Root of the profiling data store
    pub profile_data: PathBuf,

    /// Architecture directory inside each release
    pub scram_arch: String,

    /// Glob selecting the releases to process
    pub release_pattern: String,

    /// Consolidated report path
    pub outfile: PathBuf,

    /// Report serialization format
    pub format: ReportFormat,

    /// Where per-step profiler summaries are written
    pub results_dir: PathBuf,

    /// Steps read for every workflow
    pub steps: Vec<String>,

    /// Do not run the profiler summaries, only collect log metrics
    pub skip_profiles: bool,

    /// Log failing workflows and continue instead of aborting
    pub keep_going: bool,

    /// What to do with stacks the rules cannot name
    pub policy: UnclassifiedPolicy,

    /// Optional YAML file replacing the built-in grouping rules
    pub rules: Option<PathBuf>,

    /// External tool settings
    pub tools: ToolConfig,
}

impl Default for CollectArgs {
    fn default() -> Self {
        Self {
            profile_data: PathBuf::from(DEFAULT_PROFILE_DATA),
            scram_arch: DEFAULT_SCRAM_ARCH.to_string(),
            release_pattern: DEFAULT_RELEASE_PATTERN.to_string(),
            outfile: PathBuf::from(DEFAULT_OUTFILE),
            format: ReportFormat::Yaml,
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            steps: DEFAULT_STEPS.iter().map(|s| s.to_string()).collect(),
            skip_profiles: false,
            keep_going: false,
            policy: UnclassifiedPolicy::Skip,
            rules: None,
            tools: ToolConfig::default(),
        }
    }
}

/// Arguments for the group command
#[derive(Debug, Clone, Default)]
pub struct GroupArgs {
    /// Top report to group (plain, `.bz2` or `.gz`)
    pub input: PathBuf,

    /// Output file; stdout when absent
    pub output: Option<PathBuf>,

    /// Optional YAML file replacing the built-in grouping rules
    pub rules: Option<PathBuf>,

    /// What to do with stacks the rules cannot name
    pub policy: UnclassifiedPolicy,
}
