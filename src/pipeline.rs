//! One complete run: report in, metrics textfile out.

use tracing::{debug, info, warn};

use crate::derived::RamUsage;
use crate::metrics::{GaugeVec, MetricsError, Registry, write_textfile};
use crate::report::{ReportError, SectionTable, read_report};
use crate::settings::Settings;

pub const SECTION_ADDR_METRIC: &str = "elf_binary_section_addr";
pub const SECTION_SIZE_METRIC: &str = "elf_binary_section_size";
pub const RAM_USAGE_METRIC: &str = "elf_binary_ram_usage";

const SECTION_LABELS: [&str; 2] = ["label", "unit"];
const BYTE_UNIT: &str = "byte";

/// Error type for a failed run.
#[derive(Debug)]
pub enum RunError {
    /// The report could not be read.
    Report(ReportError),
    /// Metrics could not be built or written.
    Export(MetricsError),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::Report(e) => write!(f, "{}", e),
            RunError::Export(e) => write!(f, "failed to export metrics: {}", e),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Report(e) => Some(e),
            RunError::Export(e) => Some(e),
        }
    }
}

impl From<ReportError> for RunError {
    fn from(e: ReportError) -> Self {
        RunError::Report(e)
    }
}

impl From<MetricsError> for RunError {
    fn from(e: MetricsError) -> Self {
        RunError::Export(e)
    }
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub lines: usize,
    pub matched: usize,
    pub sections: usize,
    pub samples: usize,
    pub ram_usage: Option<f64>,
}

/// Builds the gauge families selected by `settings`.
///
/// Disabled families are not registered at all.
pub fn build_registry(
    sections: &SectionTable,
    settings: &Settings,
    ram_usage: Option<f64>,
) -> Result<Registry, MetricsError> {
    let mut registry = Registry::new();

    if settings.section_addrs {
        let mut addrs = GaugeVec::new(
            SECTION_ADDR_METRIC,
            "The address of the section of the binary.",
            &SECTION_LABELS,
        )?;
        for (label, addr) in sections.addresses() {
            addrs.set(&[label.as_str(), BYTE_UNIT], *addr)?;
        }
        registry.register(addrs)?;
    }

    if settings.section_sizes {
        let mut sizes = GaugeVec::new(
            SECTION_SIZE_METRIC,
            "The size of the section of the binary.",
            &SECTION_LABELS,
        )?;
        for (label, size) in sections.sizes() {
            sizes.set(&[label.as_str(), BYTE_UNIT], *size)?;
        }
        registry.register(sizes)?;
    }

    if let Some(ratio) = ram_usage {
        let mut ram = GaugeVec::unlabeled(
            RAM_USAGE_METRIC,
            "The fraction of RAM occupied by the binary.",
        )?;
        ram.set(&[], ratio)?;
        registry.register(ram)?;
    }

    Ok(registry)
}

/// Reads the report, derives metrics and writes the textfile.
pub fn run(settings: &Settings) -> Result<RunSummary, RunError> {
    let outcome = read_report(&settings.report_infile)?;
    if outcome.matched == 0 {
        warn!(
            "No section lines found in {}",
            settings.report_infile.display()
        );
    }

    let ram_usage = if settings.derived_ram {
        let usage = RamUsage::from_sections(&outcome.sections);
        let ratio = usage.ratio();
        debug!(
            "RAM usage: used={} total={} ratio={}",
            usage.used, usage.total, ratio
        );
        if !ratio.is_finite() {
            warn!(
                "RAM usage is {} (dma and relocate addresses leave no room)",
                ratio
            );
        }
        Some(ratio)
    } else {
        None
    };

    let registry = build_registry(&outcome.sections, settings, ram_usage)?;
    write_textfile(&settings.metrics_outfile, &registry)?;

    let summary = RunSummary {
        lines: outcome.lines,
        matched: outcome.matched,
        sections: outcome.sections.label_count(),
        samples: registry.sample_count(),
        ram_usage,
    };
    info!(
        "Exported {} samples for {} sections to {}",
        summary.samples,
        summary.sections,
        settings.metrics_outfile.display()
    );
    Ok(summary)
}
