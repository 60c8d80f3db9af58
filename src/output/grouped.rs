//! Grouped category totals writer.
//!
//! One `<category>;<total>` line per category, largest total first.

use super::report::create_output_file;
use crate::aggregator::CategoryTotals;
use crate::utils::error::OutputError;
use log::info;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write grouped totals to a file
pub fn write_grouped(totals: &CategoryTotals, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    let mut writer = BufWriter::new(create_output_file(output_path)?);
    write_grouped_to(totals, &mut writer)?;
    writer.flush()?;

    info!(
        "Grouped totals written to {} ({} categories)",
        output_path.display(),
        totals.len()
    );
    Ok(())
}

/// Write grouped totals to any writer (stdout, buffers)
pub fn write_grouped_to<W: Write>(totals: &CategoryTotals, writer: &mut W) -> Result<(), OutputError> {
    for line in totals.to_lines() {
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_grouped_file() {
        let mut totals = CategoryTotals::new();
        totals.add("other", 1.0);
        totals.add("InputModule", 5.0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cpu_grouped.csv");
        write_grouped(&totals, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "InputModule;5.00\nother;1.00\n");
    }

    #[test]
    fn test_write_grouped_empty() {
        let mut buf = Vec::new();
        write_grouped_to(&CategoryTotals::new(), &mut buf).unwrap();
        assert!(buf.is_empty());
    }
}
