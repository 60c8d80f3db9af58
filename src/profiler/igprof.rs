//! Summarizer backed by the `igprof-analyse` command line tool.
//!
//! Two pipelines run per raw dump:
//! - `igprof-analyse --top N ... -r COUNTER dump`, bzip2-compressed to disk
//! - `igprof-analyse --sqlite ... | <fix-up> | sqlite3 db`

use super::types::{Metric, Summarizer, Summary};
use crate::utils::config::{DEFAULT_IGPROF_ANALYSE, DEFAULT_SQLITE3, DEFAULT_SQL_FIXUP, DEFAULT_TOP_N};
use crate::utils::error::ToolError;
use bzip2::write::BzEncoder;
use bzip2::Compression;
use log::{debug, info};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};

/// Tool locations and options
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Path or name of `igprof-analyse`
    pub analyse: String,

    /// Command line of the SQL fix-up filter
    pub sql_fixup: String,

    /// Path or name of `sqlite3`
    pub sqlite3: String,

    /// Number of stacks kept in the top report
    pub top_n: usize,

    /// Also build the SQLite export
    pub structured_export: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            analyse: DEFAULT_IGPROF_ANALYSE.to_string(),
            sql_fixup: DEFAULT_SQL_FIXUP.to_string(),
            sqlite3: DEFAULT_SQLITE3.to_string(),
            top_n: DEFAULT_TOP_N,
            structured_export: true,
        }
    }
}

/// `igprof-analyse` summarizer
pub struct IgProfAnalyse {
    config: ToolConfig,
}

impl IgProfAnalyse {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    /// Write the compressed top report
    fn top_report(&self, raw_dump: &Path, metric: Metric, dest: &Path) -> Result<(), ToolError> {
        let tool = &self.config.analyse;
        debug!("Running {} --top {} on {}", tool, self.config.top_n, raw_dump.display());

        let mut child = Command::new(tool)
            .arg("--top")
            .arg(self.config.top_n.to_string())
            .args(["--demangle", "--gdb", "-r", metric.counter()])
            .arg(raw_dump)
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| ToolError::Spawn {
                tool: tool.clone(),
                source,
            })?;

        let copied = compress_stdout(&mut child, dest);
        let status = child.wait()?;
        check_status(tool, status)?;
        let bytes = copied?;

        debug!("Top report written to {} ({} bytes uncompressed)", dest.display(), bytes);
        Ok(())
    }

    /// Build the SQLite export through the fix-up filter
    fn structured_export(&self, raw_dump: &Path, metric: Metric, db: &Path) -> Result<(), ToolError> {
        let (fixup_program, fixup_args) = split_command(&self.config.sql_fixup)?;

        // sqlite3 would append to a database left by an earlier run
        if db.exists() {
            std::fs::remove_file(db)?;
        }

        let mut analyse = Command::new(&self.config.analyse)
            .args(["--sqlite", "-v", "--demangle", "--gdb", "-r", metric.counter()])
            .arg(raw_dump)
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| ToolError::Spawn {
                tool: self.config.analyse.clone(),
                source,
            })?;

        let mut fixup = match spawn_stage(fixup_program, &fixup_args, &mut analyse, true) {
            Ok(child) => child,
            Err(e) => {
                let _ = analyse.kill();
                let _ = analyse.wait();
                return Err(e);
            }
        };

        let db_arg = db.to_string_lossy().to_string();
        let mut sqlite = match spawn_stage(&self.config.sqlite3, &[db_arg.as_str()], &mut fixup, false) {
            Ok(child) => child,
            Err(e) => {
                for child in [&mut analyse, &mut fixup] {
                    let _ = child.kill();
                    let _ = child.wait();
                }
                return Err(e);
            }
        };

        let analyse_status = analyse.wait()?;
        let fixup_status = fixup.wait()?;
        let sqlite_status = sqlite.wait()?;

        check_status(&self.config.analyse, analyse_status)?;
        check_status(fixup_program, fixup_status)?;
        check_status(&self.config.sqlite3, sqlite_status)?;

        debug!("Structured export written to {}", db.display());
        Ok(())
    }
}

impl Summarizer for IgProfAnalyse {
    fn summarize(
        &self,
        raw_dump: &Path,
        metric: Metric,
        out_dir: &Path,
    ) -> Result<Summary, ToolError> {
        info!("Summarizing {} ({})", raw_dump.display(), metric);
        std::fs::create_dir_all(out_dir)?;

        let top_report = out_dir.join(metric.top_report_name());
        self.top_report(raw_dump, metric, &top_report)?;

        let structured_export = if self.config.structured_export {
            let db = out_dir.join(metric.export_name());
            self.structured_export(raw_dump, metric, &db)?;
            Some(db)
        } else {
            None
        };

        Ok(Summary {
            top_report,
            structured_export,
        })
    }
}

/// Stream a child's stdout into a bzip2 file
///
/// **Private** - returns the number of uncompressed bytes
fn compress_stdout(child: &mut Child, dest: &Path) -> Result<u64, ToolError> {
    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "child stdout not captured"))?;

    let file = File::create(dest)?;
    let mut encoder = BzEncoder::new(BufWriter::new(file), Compression::best());
    let bytes = io::copy(&mut stdout, &mut encoder)?;
    encoder.finish()?.flush()?;

    Ok(bytes)
}

/// Spawn a pipeline stage reading the previous stage's stdout
///
/// **Private** - `piped` captures this stage's stdout for the next one
fn spawn_stage(
    program: &str,
    args: &[&str],
    upstream: &mut Child,
    piped: bool,
) -> Result<Child, ToolError> {
    let input = upstream
        .stdout
        .take()
        .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "upstream stdout not captured"))?;

    Command::new(program)
        .args(args)
        .stdin(Stdio::from(input))
        .stdout(if piped { Stdio::piped() } else { Stdio::null() })
        .spawn()
        .map_err(|source| ToolError::Spawn {
            tool: program.to_string(),
            source,
        })
}

fn check_status(tool: &str, status: ExitStatus) -> Result<(), ToolError> {
    if status.success() {
        Ok(())
    } else {
        Err(ToolError::Failed {
            tool: tool.to_string(),
            status: status.to_string(),
        })
    }
}

/// Split a command line into program and arguments on whitespace
pub fn split_command(command: &str) -> Result<(&str, Vec<&str>), ToolError> {
    let mut parts = command.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| ToolError::InvalidCommand(command.to_string()))?;
    Ok((program, parts.collect()))
}
