//! Reading binary memory reports.
//!
//! A report is scanned line by line; each data line becomes a
//! [`SectionRecord`] that is folded into a [`SectionTable`].

pub mod aggregate;
pub mod parser;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

pub use aggregate::{SectionTable, WELL_KNOWN_SECTIONS};
pub use parser::{SectionRecord, parse_line};

/// Error type for report reading failures.
#[derive(Debug)]
pub enum ReportError {
    /// The report file could not be opened.
    Open { path: PathBuf, source: io::Error },
    /// I/O error while reading lines.
    Io(io::Error),
    /// A numeric field matched the data line pattern but did not convert.
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::Open { path, source } => {
                write!(f, "cannot open report {}: {}", path.display(), source)
            }
            ReportError::Io(e) => write!(f, "I/O error reading report: {}", e),
            ReportError::InvalidNumber { line, field, value } => {
                write!(f, "line {}: invalid {} value '{}'", line, field, value)
            }
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Open { source, .. } => Some(source),
            ReportError::Io(e) => Some(e),
            ReportError::InvalidNumber { .. } => None,
        }
    }
}

impl From<io::Error> for ReportError {
    fn from(e: io::Error) -> Self {
        ReportError::Io(e)
    }
}

/// Result of scanning a whole report.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub sections: SectionTable,
    /// Total lines read.
    pub lines: usize,
    /// Lines that produced a section record.
    pub matched: usize,
}

impl ScanOutcome {
    /// Lines that were not data lines.
    pub fn skipped(&self) -> usize {
        self.lines - self.matched
    }
}

/// Scans every line of `reader` into a fresh [`SectionTable`].
///
/// Lines are read as raw bytes; a line that is not UTF-8 is skipped like any
/// other non-data line.
pub fn scan_report<R: BufRead>(mut reader: R) -> Result<ScanOutcome, ReportError> {
    let mut sections = SectionTable::new();
    let mut lines = 0;
    let mut matched = 0;

    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        lines += 1;

        // Data lines are ASCII; anything else is just a non-matching line.
        let Ok(line) = std::str::from_utf8(trim_line_end(&buf)) else {
            trace!("line {}: skipped (not UTF-8)", lines);
            continue;
        };

        match parse_line(line, lines)? {
            Some(rec) => {
                trace!("line {}: .{} size={} addr={}", lines, rec.label, rec.size, rec.address);
                sections.record(rec);
                matched += 1;
            }
            None => trace!("line {}: skipped", lines),
        }
    }

    Ok(ScanOutcome {
        sections,
        lines,
        matched,
    })
}

/// Strips one trailing `\n` and then one trailing `\r`.
fn trim_line_end(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

/// Opens and scans the report at `path`.
pub fn read_report(path: &Path) -> Result<ScanOutcome, ReportError> {
    let file = File::open(path).map_err(|source| ReportError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let outcome = scan_report(BufReader::new(file))?;
    debug!(
        "Read {}: {} lines, {} sections matched, {} skipped",
        path.display(),
        outcome.lines,
        outcome.matched,
        outcome.skipped()
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
section              size         addr
.isr_vector           192    134217728
.text               49152    134217920
.relocate             256    536870912
.bss                 1024    536871168
.heap                8192    536872192
.dma                    0    536936448
Total               58816
";

    #[test]
    fn test_scan_sample_report() {
        let outcome = scan_report(SAMPLE.as_bytes()).unwrap();

        assert_eq!(outcome.lines, 8);
        assert_eq!(outcome.matched, 6);
        assert_eq!(outcome.skipped(), 2);

        let s = &outcome.sections;
        assert_eq!(s.label_count(), 6);
        assert_eq!(s.size("text"), 49152.0);
        assert_eq!(s.address("text"), 134217920.0);
        assert_eq!(s.address("relocate"), 536870912.0);
        assert_eq!(s.size("heap"), 8192.0);
    }

    #[test]
    fn test_scan_empty_input_keeps_seed() {
        let outcome = scan_report("".as_bytes()).unwrap();

        assert_eq!(outcome.lines, 0);
        assert_eq!(outcome.matched, 0);
        assert_eq!(outcome.sections, SectionTable::new());
        let labels: Vec<&str> = outcome.sections.sizes().keys().map(String::as_str).collect();
        assert_eq!(labels, vec!["dma", "heap", "relocate"]);
    }

    #[test]
    fn test_scan_last_write_wins() {
        let outcome = scan_report(".heap 10 100\n.heap 20 200\n".as_bytes()).unwrap();
        assert_eq!(outcome.matched, 2);
        assert_eq!(outcome.sections.size("heap"), 20.0);
        assert_eq!(outcome.sections.address("heap"), 200.0);
    }

    #[test]
    fn test_scan_crlf_line_endings() {
        let outcome = scan_report(".heap 10 120\r\n.dma 0 200\r\n".as_bytes()).unwrap();
        assert_eq!(outcome.matched, 2);
        assert_eq!(outcome.sections.address("dma"), 200.0);
    }

    #[test]
    fn test_scan_skips_non_utf8_lines() {
        let input: &[u8] = b"section size addr \xe9\xff\n.heap 10 120\n.dma\xff 0 200\n";
        let outcome = scan_report(input).unwrap();

        assert_eq!(outcome.lines, 3);
        assert_eq!(outcome.matched, 1);
        assert_eq!(outcome.sections.size("heap"), 10.0);
        assert_eq!(outcome.sections.address("heap"), 120.0);
        assert_eq!(outcome.sections.label_count(), 3);
    }

    #[test]
    fn test_scan_last_line_without_newline() {
        let outcome = scan_report(".heap 10 120\n.dma 0 200".as_bytes()).unwrap();
        assert_eq!(outcome.lines, 2);
        assert_eq!(outcome.sections.address("dma"), 200.0);
    }

    #[test]
    fn test_trim_line_end() {
        assert_eq!(trim_line_end(b".heap 1 2\r\n"), b".heap 1 2");
        assert_eq!(trim_line_end(b".heap 1 2\n"), b".heap 1 2");
        assert_eq!(trim_line_end(b".heap 1 2"), b".heap 1 2");
        assert_eq!(trim_line_end(b"\n"), b"");
    }

    #[test]
    fn test_scan_reports_line_of_invalid_number() {
        let input = format!(".heap 1 2\nheader\n.dma 0 {}\n", "9".repeat(400));
        match scan_report(input.as_bytes()) {
            Err(ReportError::InvalidNumber { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected InvalidNumber, got {:?}", other),
        }
    }

    #[test]
    fn test_read_report_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.stats");

        let err = read_report(&path).unwrap_err();
        assert!(matches!(err, ReportError::Open { .. }));
        assert!(err.to_string().contains("memory.stats"));
    }

    #[test]
    fn test_read_report_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.stats");
        std::fs::write(&path, SAMPLE).unwrap();

        let outcome = read_report(&path).unwrap();
        assert_eq!(outcome.matched, 6);
        assert_eq!(outcome.sections.address("dma"), 536936448.0);
    }
}
