//! Grouping of sampled call stacks into report categories.
//!
//! This module transforms parsed stack samples into:
//! - Cleaned stacks (deduplicated, cut at unit-of-work boundaries)
//! - Category names via ordered classification rules
//! - Per-category totals sorted by weight

pub mod classifier;
pub mod metrics;
pub mod stack_builder;

// Re-export main types and functions
pub use classifier::{default_rules, name_stack, GroupingConfig, Matcher, Resolver, Rule};
pub use metrics::{CategoryTotals, ReportRow};
pub use stack_builder::{
    clean_stack, group_samples, group_stack_dump, GroupingOutcome, UnclassifiedPolicy,
};
