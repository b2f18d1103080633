//! Resolved run configuration.

use std::path::PathBuf;

use serde::Serialize;

pub const DEFAULT_REPORT_INFILE: &str = "memory.stats";
pub const DEFAULT_METRICS_OUTFILE: &str = "out.prom";

/// Everything a run needs, after flags have been parsed.
///
/// Serialized key names match the command line flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    #[serde(rename = "report.infile")]
    pub report_infile: PathBuf,
    #[serde(rename = "metrics.outfile")]
    pub metrics_outfile: PathBuf,
    #[serde(rename = "metrics.sections.addrs")]
    pub section_addrs: bool,
    #[serde(rename = "metrics.sections.sizes")]
    pub section_sizes: bool,
    #[serde(rename = "metrics.derived.ram")]
    pub derived_ram: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            report_infile: PathBuf::from(DEFAULT_REPORT_INFILE),
            metrics_outfile: PathBuf::from(DEFAULT_METRICS_OUTFILE),
            section_addrs: false,
            section_sizes: true,
            derived_ram: false,
        }
    }
}
