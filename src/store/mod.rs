//! Layout of the profiling data store.
//!
//! ```text
//! <root>/CMSSW_<version>/<arch>/<workflow>/
//!     <step>_TimeMemoryInfo.log
//!     <step>.root | <step>.root.unused
//!     <step>_igprofCPU.gz
//!     <step>_igprofMEM.gz
//! ```

use crate::profiler::Metric;
use crate::utils::config::RELEASE_PREFIX;
use crate::utils::error::ArtifactError;
use crate::utils::glob::GlobPattern;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Files of one workflow step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepArtifacts {
    pub timing_log: PathBuf,
    pub root_file: PathBuf,
    pub cpu_dump: PathBuf,
    pub mem_dump: PathBuf,
}

impl StepArtifacts {
    /// Resolve and check the artifacts of `step` in a workflow directory
    pub fn locate(workflow_dir: &Path, step: &str) -> Result<Self, ArtifactError> {
        let unused = workflow_dir.join(format!("{}.root.unused", step));
        let root_file = if unused.is_file() {
            unused
        } else {
            workflow_dir.join(format!("{}.root", step))
        };

        let artifacts = Self {
            timing_log: workflow_dir.join(format!("{}_TimeMemoryInfo.log", step)),
            root_file,
            cpu_dump: workflow_dir.join(Metric::Cpu.raw_dump_name(step)),
            mem_dump: workflow_dir.join(Metric::Mem.raw_dump_name(step)),
        };

        for path in [&artifacts.timing_log, &artifacts.root_file] {
            require_file(path)?;
        }

        Ok(artifacts)
    }

    /// Raw dump for a metric; checked on access since summaries are optional
    pub fn raw_dump(&self, metric: Metric) -> Result<&Path, ArtifactError> {
        let path = match metric {
            Metric::Cpu => &self.cpu_dump,
            Metric::Mem => &self.mem_dump,
        };
        require_file(path)?;
        Ok(path)
    }
}

/// The data store rooted at one directory
#[derive(Debug, Clone)]
pub struct ProfileStore {
    root: PathBuf,
}

impl ProfileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Release directories matching the pattern, sorted by name
    pub fn releases(&self, pattern: &GlobPattern) -> Result<Vec<String>, ArtifactError> {
        let mut releases = Vec::new();

        for name in list_names(&self.root)? {
            if !name.starts_with(RELEASE_PREFIX) {
                continue;
            }
            if pattern.matches(&name) {
                releases.push(name);
            } else {
                info!("Skipping {} (does not match '{}')", name, pattern.as_str());
            }
        }

        Ok(releases)
    }

    /// Workflow directories of a release, sorted by name
    ///
    /// A workflow name has a dot and a non-zero integer before the first dot.
    pub fn workflows(&self, release: &str, arch: &str) -> Result<Vec<String>, ArtifactError> {
        let dir = self.arch_dir(release, arch);
        let workflows = list_names(&dir)?
            .into_iter()
            .filter(|name| {
                let keep = is_workflow_name(name);
                if !keep {
                    debug!("Ignoring {} in {}", name, dir.display());
                }
                keep
            })
            .collect();

        Ok(workflows)
    }

    pub fn arch_dir(&self, release: &str, arch: &str) -> PathBuf {
        self.root.join(release).join(arch)
    }

    pub fn workflow_dir(&self, release: &str, arch: &str, workflow: &str) -> PathBuf {
        self.arch_dir(release, arch).join(workflow)
    }
}

/// Directory for the summaries of one step
///
/// `<results>/igprof/<version>/<workflow>/<step>` with the `CMSSW_` prefix dropped.
pub fn summary_dir(results: &Path, release: &str, workflow: &str, step: &str) -> PathBuf {
    let version = release.strip_prefix(RELEASE_PREFIX).unwrap_or(release);
    results
        .join("igprof")
        .join(version)
        .join(workflow)
        .join(step)
}

pub fn is_workflow_name(name: &str) -> bool {
    match name.split_once('.') {
        Some((number, _)) => number.parse::<u64>().map(|n| n != 0).unwrap_or(false),
        None => false,
    }
}

fn require_file(path: &Path) -> Result<(), ArtifactError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ArtifactError::MissingArtifact(path.to_path_buf()))
    }
}

fn list_names(dir: &Path) -> Result<Vec<String>, ArtifactError> {
    let listing_error = |source| ArtifactError::Listing {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(listing_error)? {
        let entry = entry.map_err(listing_error)?;
        names.push(entry.file_name().to_string_lossy().to_string());
    }
    names.sort();

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_is_workflow_name() {
        assert!(is_workflow_name("11634.0"));
        assert!(is_workflow_name("136.889"));
        assert!(!is_workflow_name("0.5"));
        assert!(!is_workflow_name("logs"));
        assert!(!is_workflow_name("summary.txt"));
    }

    #[test]
    fn test_summary_dir() {
        let dir = summary_dir(Path::new("results"), "CMSSW_12_0_0", "11634.0", "step3");
        assert_eq!(dir, Path::new("results/igprof/12_0_0/11634.0/step3"));
    }

    #[test]
    fn test_locate_prefers_unused_root_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("step3_TimeMemoryInfo.log"), "").unwrap();
        fs::write(dir.path().join("step3.root"), "").unwrap();
        fs::write(dir.path().join("step3.root.unused"), "").unwrap();

        let artifacts = StepArtifacts::locate(dir.path(), "step3").unwrap();
        assert_eq!(artifacts.root_file, dir.path().join("step3.root.unused"));
    }

    #[test]
    fn test_locate_missing_log() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("step4.root"), "").unwrap();

        let result = StepArtifacts::locate(dir.path(), "step4");
        assert!(matches!(result, Err(ArtifactError::MissingArtifact(p)) if p.ends_with("step4_TimeMemoryInfo.log")));
    }

    #[test]
    fn test_missing_raw_dump() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("step3_TimeMemoryInfo.log"), "").unwrap();
        fs::write(dir.path().join("step3.root"), "").unwrap();
        fs::write(dir.path().join("step3_igprofCPU.gz"), "").unwrap();

        let artifacts = StepArtifacts::locate(dir.path(), "step3").unwrap();
        assert!(artifacts.raw_dump(Metric::Cpu).is_ok());
        assert!(artifacts.raw_dump(Metric::Mem).is_err());
    }

    #[test]
    fn test_releases_and_workflows() {
        let dir = tempfile::tempdir().unwrap();
        for release in ["CMSSW_12_0_0", "CMSSW_11_3_0", "other_dir"] {
            fs::create_dir_all(dir.path().join(release).join("slc7_amd64_gcc900")).unwrap();
        }
        let arch_dir = dir.path().join("CMSSW_12_0_0/slc7_amd64_gcc900");
        for wf in ["11634.0", "136.889", "logs", "0.1"] {
            fs::create_dir_all(arch_dir.join(wf)).unwrap();
        }

        let store = ProfileStore::new(dir.path());
        let all = store.releases(&GlobPattern::new("*").unwrap()).unwrap();
        assert_eq!(all, vec!["CMSSW_11_3_0", "CMSSW_12_0_0"]);

        let filtered = store.releases(&GlobPattern::new("CMSSW_12_*").unwrap()).unwrap();
        assert_eq!(filtered, vec!["CMSSW_12_0_0"]);

        let workflows = store.workflows("CMSSW_12_0_0", "slc7_amd64_gcc900").unwrap();
        assert_eq!(workflows, vec!["11634.0", "136.889"]);
    }
}
