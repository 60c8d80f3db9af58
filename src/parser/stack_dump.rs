//! Reader for `igprof-analyse --top` text reports.
//!
//! The report is a two-level line-marker scheme:
//! - `## ...` opens a stack; its 4th token carries the measurement
//!   (e.g. `'+123456'` -> 123456.0)
//! - `#<index> <function>(<args>) ...` adds one frame to the open stack
//! - any other line closes the open stack
//!
//! Reports may be bzip2 or gzip compressed; the reader is a single-pass iterator.

use super::schema::Sample;
use crate::utils::config::{
    ANONYMOUS_NAMESPACE, FRAME_MARKER, MEASUREMENT_TOKEN, STACK_START_MARKER,
};
use crate::utils::error::ParseError;
use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Streaming sample reader over a top report
pub struct SampleReader<R> {
    reader: R,
    line_no: usize,
    open: Option<Sample>,
    finished: bool,
}

impl<R: BufRead> SampleReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            open: None,
            finished: false,
        }
    }

    fn read_line(&mut self) -> Result<Option<String>, ParseError> {
        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;

        let line = String::from_utf8_lossy(&buf);
        Ok(Some(line.trim_end_matches(&['\n', '\r'][..]).to_string()))
    }

    /// Feed one line; returns a sample when the line closes one
    fn process_line(&mut self, line: &str) -> Result<Option<Sample>, ParseError> {
        if line.starts_with(STACK_START_MARKER) {
            let measurement = parse_measurement(line, self.line_no)?;
            let previous = self.open.replace(Sample::new(Vec::new(), measurement));
            return Ok(previous);
        }

        if line.starts_with(FRAME_MARKER) {
            let Some(sample) = self.open.as_mut() else {
                return Err(ParseError::FrameOutsideStack { line: self.line_no });
            };
            if let Some(frame) = normalize_frame(line, self.line_no)? {
                sample.frames.push(frame);
            }
            return Ok(None);
        }

        Ok(self.open.take())
    }
}

impl<R: BufRead> Iterator for SampleReader<R> {
    type Item = Result<Sample, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let line = match self.read_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.finished = true;
                    return self.open.take().map(Ok);
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            };

            match self.process_line(&line) {
                Ok(Some(sample)) => return Some(Ok(sample)),
                Ok(None) => continue,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Open a top report, decompressing `.bz2` and `.gz` files on the fly
pub fn open_stack_dump(
    path: impl AsRef<Path>,
) -> Result<SampleReader<Box<dyn BufRead>>, ParseError> {
    let path = path.as_ref();
    debug!("Opening stack dump: {}", path.display());

    let file = File::open(path)?;
    let reader: Box<dyn BufRead> = match path.extension().and_then(|e| e.to_str()) {
        Some("bz2") => Box::new(BufReader::new(MultiBzDecoder::new(file))),
        Some("gz") => Box::new(BufReader::new(MultiGzDecoder::new(file))),
        _ => Box::new(BufReader::new(file)),
    };

    Ok(SampleReader::new(reader))
}

/// Read every sample of an in-memory report
pub fn parse_samples(content: &str) -> Result<Vec<Sample>, ParseError> {
    SampleReader::new(content.as_bytes()).collect()
}

/// Extract the measurement from a stack header line
fn parse_measurement(line: &str, line_no: usize) -> Result<f64, ParseError> {
    let token = line
        .split_whitespace()
        .nth(MEASUREMENT_TOKEN)
        .ok_or(ParseError::MissingMeasurement { line: line_no })?;

    // Leading sign character, then a quoted number
    let mut chars = token.chars();
    chars.next();
    let cleaned: String = chars.filter(|&c| c != '\'').collect();

    cleaned
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidMeasurement {
            line: line_no,
            token: token.to_string(),
        })
}

/// Normalize a frame line into a function name
///
/// Returns `Ok(None)` for lines without an argument list.
pub fn normalize_frame(line: &str, line_no: usize) -> Result<Option<String>, ParseError> {
    let line = line.replace(ANONYMOUS_NAMESPACE, "").replace(", ", ",");

    let (_, rest) = line
        .split_once(' ')
        .ok_or(ParseError::MissingFrameIndex { line: line_no })?;
    let compact: String = rest.chars().filter(|&c| c != ' ').collect();

    Ok(compact.find('(').map(|pos| compact[..pos].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_measurement() {
        assert_eq!(parse_measurement("## 1 0.5 '+1234.5'", 1).unwrap(), 1234.5);
        assert_eq!(parse_measurement("## 1 0.5 -'42'", 1).unwrap(), 42.0);
    }

    #[test]
    fn test_parse_measurement_errors() {
        assert!(matches!(
            parse_measurement("## 1 0.5", 7),
            Err(ParseError::MissingMeasurement { line: 7 })
        ));
        assert!(matches!(
            parse_measurement("## 1 0.5 '+abc'", 3),
            Err(ParseError::InvalidMeasurement { line: 3, .. })
        ));
    }

    #[test]
    fn test_normalize_frame_strips_arguments() {
        let frame = normalize_frame("#12 X::produce(int)", 1).unwrap();
        assert_eq!(frame.as_deref(), Some("X::produce"));
    }

    #[test]
    fn test_normalize_frame_removes_anonymous_namespace() {
        let frame = normalize_frame("#3 (anonymous namespace)::Helper::run(double, int)", 1).unwrap();
        assert_eq!(frame.as_deref(), Some("Helper::run"));
    }

    #[test]
    fn test_normalize_frame_removes_spaces_in_templates() {
        let frame = normalize_frame("#4 std::map<int, edm::Ref >::find(int const&)", 1).unwrap();
        assert_eq!(frame.as_deref(), Some("std::map<int,edm::Ref>::find"));
    }

    #[test]
    fn test_normalize_frame_without_parenthesis() {
        assert_eq!(normalize_frame("#5 <spontaneous>", 1).unwrap(), None);
    }

    #[test]
    fn test_normalize_frame_without_index() {
        assert!(matches!(
            normalize_frame("#frame()", 9),
            Err(ParseError::MissingFrameIndex { line: 9 })
        ));
    }

    #[test]
    fn test_blank_line_closes_stack() {
        let dump = "## 1 10.0 '+10'\n#1 A::foo()\n#2 B::doEvent()\n\n## 2 5.0 '+5'\n#1 C::bar()\n";
        let samples = parse_samples(dump).unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].frames, vec!["A::foo", "B::doEvent"]);
        assert_eq!(samples[0].measurement, 10.0);
        assert_eq!(samples[1].frames, vec!["C::bar"]);
        assert_eq!(samples[1].measurement, 5.0);
    }

    #[test]
    fn test_consecutive_other_lines_flush_once() {
        let dump = "## 1 1.0 '+3'\n#1 A::foo()\n\n\n---\n";
        let samples = parse_samples(dump).unwrap();
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn test_header_lines_before_first_stack_are_ignored() {
        let dump = "Counter: MEM_LIVE\n\n## 1 1.0 '+3'\n#1 A::foo()\n";
        let samples = parse_samples(dump).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].frames, vec!["A::foo"]);
    }

    #[test]
    fn test_frame_outside_stack_fails() {
        let result = parse_samples("#1 A::foo()\n");
        assert!(matches!(result, Err(ParseError::FrameOutsideStack { line: 1 })));
    }

    #[test]
    fn test_bad_measurement_fails_fast() {
        let result = parse_samples("## 1 1.0 '+3'\n#1 A::foo()\n\n## 2 1.0 'x'\n");
        assert!(matches!(result, Err(ParseError::InvalidMeasurement { line: 4, .. })));
    }
}
