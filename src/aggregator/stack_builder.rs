//! Group sampled call stacks into named categories.
//!
//! Each sample goes through three stages:
//! 1. clean: drop duplicate frames, cut at the first unit-of-work boundary
//! 2. classify: name the cleaned stack with the configured rules
//! 3. accumulate: add the measurement to the category total
//!
//! Samples whose cleaned stack is empty are skipped entirely.

use super::classifier::GroupingConfig;
use super::metrics::CategoryTotals;
use crate::parser::stack_dump::open_stack_dump;
use crate::parser::Sample;
use crate::utils::error::{ClassificationError, GroupError, ParseError};
use log::{debug, warn};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// What to do with a stack the rules cannot name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnclassifiedPolicy {
    /// Fail the whole dump
    Abort,
    /// Drop the sample and log it
    #[default]
    Skip,
    /// Count the sample under the fallback category
    Other,
}

impl FromStr for UnclassifiedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            "other" => Ok(Self::Other),
            _ => Err(format!(
                "unknown policy '{}' (expected abort, skip or other)",
                s
            )),
        }
    }
}

impl fmt::Display for UnclassifiedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Abort => "abort",
            Self::Skip => "skip",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Result of grouping one dump
#[derive(Debug, Clone, Default)]
pub struct GroupingOutcome {
    pub totals: CategoryTotals,

    /// Samples read from the dump
    pub samples: usize,

    /// Samples dropped because nothing survived cleaning
    pub empty: usize,

    /// Samples the rules could not name (skipped or sent to the fallback)
    pub unclassified: usize,
}

/// Deduplicate frames and cut the stack at the first boundary frame
///
/// The boundary check runs on every raw frame, including duplicates that are
/// not appended again.
pub fn clean_stack<S: AsRef<str>>(frames: &[String], boundaries: &[S]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();

    for frame in frames {
        if !frame.is_empty() && !cleaned.contains(frame) {
            cleaned.push(frame.clone());
        }
        if boundaries.iter().any(|b| frame.ends_with(b.as_ref())) {
            break;
        }
    }

    cleaned
}

/// Group a stream of samples
///
/// `source` names the input in error messages.
pub fn group_samples<I>(
    samples: I,
    config: &GroupingConfig,
    policy: UnclassifiedPolicy,
    source: &str,
) -> Result<GroupingOutcome, GroupError>
where
    I: IntoIterator<Item = Result<Sample, ParseError>>,
{
    let mut outcome = GroupingOutcome::default();

    for (stack_index, sample) in samples.into_iter().enumerate() {
        let sample = sample.map_err(|e| GroupError::Parse {
            path: source.to_string(),
            source: e,
        })?;
        outcome.samples += 1;

        let cleaned = clean_stack(&sample.frames, &config.boundaries);
        if cleaned.is_empty() {
            outcome.empty += 1;
            continue;
        }

        let category = match config.classify(&cleaned) {
            Ok(name) => name,
            Err(e) => {
                outcome.unclassified += 1;
                match resolve_unclassified(e, policy, source, stack_index, config)? {
                    Some(name) => name,
                    None => continue,
                }
            }
        };

        outcome.totals.add(&category, sample.measurement);
    }

    debug!(
        "Grouped {} samples from {} into {} categories ({} empty, {} unclassified)",
        outcome.samples,
        source,
        outcome.totals.len(),
        outcome.empty,
        outcome.unclassified
    );

    Ok(outcome)
}

/// Group every sample of a top report on disk
///
/// **Public** - used by both the collect and group commands
///
/// # Arguments
/// * `path` - Top report, plain text or compressed (`.bz2`, `.gz`)
/// * `config` - Boundary suffixes and classification rules
/// * `policy` - What to do with stacks the rules cannot name
///
/// # Returns
/// Category totals plus sample counters
///
/// # Errors
/// * `GroupError::Parse` - the report cannot be opened or a line is malformed
/// * `GroupError::Classification` - a stack cannot be named under `UnclassifiedPolicy::Abort`
///
/// # Example
/// ```ignore
/// let outcome = group_stack_dump("cpu.txt.bz2", &GroupingConfig::default(), UnclassifiedPolicy::Skip)?;
/// println!("{}", outcome.totals.to_lines().join("\n"));
/// ```
pub fn group_stack_dump(
    path: impl AsRef<Path>,
    config: &GroupingConfig,
    policy: UnclassifiedPolicy,
) -> Result<GroupingOutcome, GroupError> {
    let path = path.as_ref();
    let source = path.display().to_string();

    let reader = open_stack_dump(path).map_err(|e| GroupError::Parse {
        path: source.clone(),
        source: e,
    })?;

    group_samples(reader, config, policy, &source)
}

/// Apply the policy to a classification failure
///
/// **Private** - `Ok(None)` means drop the sample
fn resolve_unclassified(
    error: ClassificationError,
    policy: UnclassifiedPolicy,
    source: &str,
    stack_index: usize,
    config: &GroupingConfig,
) -> Result<Option<String>, GroupError> {
    match policy {
        UnclassifiedPolicy::Abort => Err(GroupError::Classification {
            path: source.to_string(),
            stack_index,
            source: error,
        }),
        UnclassifiedPolicy::Skip => {
            warn!("{}: skipping stack #{}: {}", source, stack_index, error);
            Ok(None)
        }
        UnclassifiedPolicy::Other => {
            warn!(
                "{}: counting stack #{} as '{}': {}",
                source, stack_index, config.fallback, error
            );
            Ok(Some(config.fallback.clone()))
        }
    }
}
