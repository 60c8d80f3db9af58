//! Configuration and constants for the CLI.

/// Default location of the profiling data store
pub const DEFAULT_PROFILE_DATA: &str = "/eos/cms/store/user/cmsbuild/profiling/data/";

/// Default SCRAM architecture directory to look into
pub const DEFAULT_SCRAM_ARCH: &str = "slc7_amd64_gcc900";

/// Default glob selecting releases
pub const DEFAULT_RELEASE_PATTERN: &str = "*";

/// Default output report path
pub const DEFAULT_OUTFILE: &str = "out.yaml";

/// Default directory for per-step profiler summaries
pub const DEFAULT_RESULTS_DIR: &str = "results";

/// Release directories carry this prefix
pub const RELEASE_PREFIX: &str = "CMSSW_";

/// Steps summarized for every workflow
pub const DEFAULT_STEPS: &[&str] = &["step3", "step4"];

// Log labels for scalar metrics
pub const CPU_EVENT_LABEL: &str = "TimeReport       event loop CPU/event =";
pub const RSS_LABEL: &str = "RSS";
pub const RSS_COLUMN: usize = 7;

// External tools
pub const DEFAULT_IGPROF_ANALYSE: &str = "igprof-analyse";
pub const DEFAULT_SQL_FIXUP: &str = "python fix-igprof-sql.py";
pub const DEFAULT_SQLITE3: &str = "sqlite3";
pub const DEFAULT_TOP_N: usize = 1000;

// Stack dump markers
pub const STACK_START_MARKER: &str = "## ";
pub const FRAME_MARKER: char = '#';
pub const ANONYMOUS_NAMESPACE: &str = "(anonymous namespace)::";
pub const MEASUREMENT_TOKEN: usize = 3;

// Frames ending with one of these close a unit of work
pub const BOUNDARY_SUFFIXES: &[&str] = &[
    "doEvent",
    "beginRun",
    "Factory::makeModule",
    "EventProcessor::init",
];

// Entry points used by the built-in classification rules
pub const OUTPUT_WRITE_FRAME: &str = "edm::PoolOutputModule::write";
pub const INPUT_READ_FRAMES: &[&str] = &["TBasket::ReadBasketBuffers", "TBranch::GetEntry"];
pub const CLEAR_PRINCIPAL_FRAME: &str = "edm::EventPrincipal::clearEventPrincipal";
pub const PRODUCE_MARKER: &str = "::produce";
pub const MAKE_MODULE_OFFSET: usize = 5;
pub const FALLBACK_CATEGORY: &str = "other";
