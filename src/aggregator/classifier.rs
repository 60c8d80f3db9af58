//! Rule-based naming of cleaned call stacks.
//!
//! A [`GroupingConfig`] holds the boundary suffixes used to cut stacks and an
//! ordered list of rules. Each rule pairs a matcher (does this rule apply?)
//! with a resolver (which category name does it produce?). The first rule
//! whose matcher fires decides the outcome, even when its resolver fails.
//!
//! The built-in rules can be replaced by a YAML file:
//!
//! ```yaml
//! boundaries: [doEvent, beginRun]
//! fallback: other
//! rules:
//!   - name: output-module
//!     matcher: { any_frame: [edm::PoolOutputModule::write] }
//!     resolver: { fixed: PoolOutputModule }
//!   - name: module-produce
//!     matcher: { last_ends_with: doEvent }
//!     resolver: { first_containing: "::produce" }
//! ```

use crate::utils::config::{
    BOUNDARY_SUFFIXES, CLEAR_PRINCIPAL_FRAME, FALLBACK_CATEGORY, INPUT_READ_FRAMES,
    MAKE_MODULE_OFFSET, OUTPUT_WRITE_FRAME, PRODUCE_MARKER,
};
use crate::utils::error::{ClassificationError, ConfigError};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Decides whether a rule applies to a stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Matcher {
    /// Some frame equals one of the names
    AnyFrame(Vec<String>),

    /// The stack is non-empty and its last frame ends with the suffix
    LastEndsWith(String),
}

impl Matcher {
    /// The frame that triggered the match, if the rule applies
    pub fn matches<'a>(&self, stack: &'a [String]) -> Option<&'a str> {
        match self {
            Matcher::AnyFrame(names) => stack
                .iter()
                .find(|frame| names.iter().any(|name| name == *frame))
                .map(String::as_str),
            Matcher::LastEndsWith(suffix) => stack
                .last()
                .filter(|last| last.ends_with(suffix.as_str()))
                .map(String::as_str),
        }
    }
}

/// Produces the category name once a rule applies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolver {
    /// A constant category
    Fixed(String),

    /// The frame the matcher fired on
    MatchedFrame,

    /// The last frame of the stack
    LastFrame,

    /// The first frame containing the marker
    FirstContaining(String),

    /// The frame at this offset from the end (1 = last)
    FromEnd(usize),
}

impl Resolver {
    pub fn resolve(&self, stack: &[String], matched: &str) -> Result<String, ClassificationError> {
        let last = stack.last().map(String::as_str).unwrap_or_default();

        match self {
            Resolver::Fixed(name) => Ok(name.clone()),
            Resolver::MatchedFrame => Ok(matched.to_string()),
            Resolver::LastFrame => Ok(last.to_string()),
            Resolver::FirstContaining(marker) => stack
                .iter()
                .find(|frame| frame.contains(marker.as_str()))
                .cloned()
                .ok_or_else(|| ClassificationError::NoProducer {
                    last: last.to_string(),
                    marker: marker.clone(),
                }),
            Resolver::FromEnd(offset) => {
                if *offset == 0 || stack.len() < *offset {
                    return Err(ClassificationError::StackTooShort {
                        last: last.to_string(),
                        len: stack.len(),
                        offset: *offset,
                    });
                }
                Ok(stack[stack.len() - offset].clone())
            }
        }
    }
}

/// One classification rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub matcher: Matcher,
    pub resolver: Resolver,
}

impl Rule {
    pub fn new(name: &str, matcher: Matcher, resolver: Resolver) -> Self {
        Self {
            name: name.to_string(),
            matcher,
            resolver,
        }
    }

    /// `None` if the rule does not apply, otherwise its outcome
    pub fn apply(&self, stack: &[String]) -> Option<Result<String, ClassificationError>> {
        self.matcher
            .matches(stack)
            .map(|matched| self.resolver.resolve(stack, matched))
    }
}

/// Boundary suffixes and ordered rules used to group stacks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingConfig {
    #[serde(default = "default_boundaries")]
    pub boundaries: Vec<String>,

    #[serde(default = "default_rules")]
    pub rules: Vec<Rule>,

    #[serde(default = "default_fallback")]
    pub fallback: String,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            boundaries: default_boundaries(),
            rules: default_rules(),
            fallback: default_fallback(),
        }
    }
}

impl GroupingConfig {
    /// Load a rule file; missing sections keep their built-in values
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: GroupingConfig = serde_yaml::from_str(&content)?;
        info!(
            "Loaded {} grouping rules from: {}",
            config.rules.len(),
            path.display()
        );
        Ok(config)
    }

    /// Load a rule file if given, otherwise use the built-in rules
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    /// Name a cleaned stack
    pub fn classify(&self, stack: &[String]) -> Result<String, ClassificationError> {
        name_stack(stack, &self.rules, &self.fallback)
    }
}

/// Apply rules in order; the first applicable rule decides
pub fn name_stack(
    stack: &[String],
    rules: &[Rule],
    fallback: &str,
) -> Result<String, ClassificationError> {
    rules
        .iter()
        .find_map(|rule| rule.apply(stack))
        .unwrap_or_else(|| Ok(fallback.to_string()))
}

fn default_boundaries() -> Vec<String> {
    BOUNDARY_SUFFIXES.iter().map(|s| s.to_string()).collect()
}

fn default_fallback() -> String {
    FALLBACK_CATEGORY.to_string()
}

/// Built-in rules for CMSSW framework stacks
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "output-module",
            Matcher::AnyFrame(vec![OUTPUT_WRITE_FRAME.to_string()]),
            Resolver::Fixed("PoolOutputModule".to_string()),
        ),
        Rule::new(
            "input-module",
            Matcher::AnyFrame(INPUT_READ_FRAMES.iter().map(|s| s.to_string()).collect()),
            Resolver::Fixed("InputModule".to_string()),
        ),
        Rule::new(
            "clear-event-principal",
            Matcher::AnyFrame(vec![CLEAR_PRINCIPAL_FRAME.to_string()]),
            Resolver::MatchedFrame,
        ),
        Rule::new(
            "module-produce",
            Matcher::LastEndsWith("doEvent".to_string()),
            Resolver::FirstContaining(PRODUCE_MARKER.to_string()),
        ),
        Rule::new(
            "begin-run",
            Matcher::LastEndsWith("beginRun".to_string()),
            Resolver::LastFrame,
        ),
        Rule::new(
            "module-construction",
            Matcher::LastEndsWith("makeModule".to_string()),
            Resolver::FromEnd(MAKE_MODULE_OFFSET),
        ),
        Rule::new(
            "processor-init",
            Matcher::LastEndsWith("EventProcessor::init".to_string()),
            Resolver::LastFrame,
        ),
    ]
}
