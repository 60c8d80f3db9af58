//! CMSSW Profiling Digest
//!
//! Aggregation of profiling results produced by the CMSSW
//! release-validation benchmarking harness.
//!
//! The crate walks a profiling data store, reads timing and memory
//! metrics from step logs, summarizes IgProf call-graph dumps with
//! `igprof-analyse` and groups the summarized call stacks into a
//! handful of named categories.
//!
//! ## Getting Started
//!
//! ```bash
//! cmssw-profiling-digest collect --release-pattern 'CMSSW_12_*'
//! cmssw-profiling-digest group --input results/igprof/12_0_0/11634.0/step3/cpu.txt.bz2
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod profiler;
pub mod store;
pub mod utils;
