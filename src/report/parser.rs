//! Parser for data lines of a binary memory report.
//!
//! A data line names a section and carries its size and start address:
//!
//! ```text
//! .heap      4096   536870912
//! ```
//!
//! Everything else in the report (headers, totals, blank lines) is ignored.
//! The parser is a pure function over `&str` so it can be tested without files.

use std::sync::LazyLock;

use regex::Regex;

use super::ReportError;

/// `.label  size  address`, ASCII classes only.
static DATA_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\.([0-9A-Za-z_]+)[\t\n\f\r ]+([0-9]+)[\t\n\f\r ]+([0-9]+)$")
        .expect("data line pattern is valid")
});

/// One section entry extracted from a data line.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRecord {
    /// Section name without the leading `.`.
    pub label: String,
    /// Size in bytes (first number on the line).
    pub size: f64,
    /// Start address (second number on the line).
    pub address: f64,
}

/// Parses a single report line.
///
/// Returns `Ok(None)` for anything that is not a well-formed data line.
/// `line_no` is only used for error reporting.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<SectionRecord>, ReportError> {
    if !line.starts_with('.') {
        return Ok(None);
    }

    let Some(caps) = DATA_LINE.captures(line) else {
        return Ok(None);
    };

    let address = parse_number(&caps[3], "address", line_no)?;
    let size = parse_number(&caps[2], "size", line_no)?;

    Ok(Some(SectionRecord {
        label: caps[1].to_string(),
        size,
        address,
    }))
}

/// Converts a digit run to `f64`.
///
/// The pattern guarantees only ASCII digits reach here, so the only way
/// to fail is overflow to infinity on an absurdly long digit run.
fn parse_number(digits: &str, field: &'static str, line_no: usize) -> Result<f64, ReportError> {
    match digits.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ReportError::InvalidNumber {
            line: line_no,
            field,
            value: digits.to_string(),
        }),
    }
}
