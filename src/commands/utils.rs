use crate::output::read_report;
use anyhow::Result;
use std::path::PathBuf;

/// Validate a report file and print what it contains
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    println!("✓ Valid report");
    println!("  Releases: {}", report.len());

    for (release, entry) in &report {
        let values: usize = entry.workflows.values().map(|m| m.len()).sum();
        println!(
            "  {} ({}): {} workflows, {} values",
            release,
            entry.arch,
            entry.workflows.len(),
            values
        );
    }

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("CMSSW Profiling Digest v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Aggregates IgProf, timing and memory profiles of CMSSW release validation workflows.");
}
