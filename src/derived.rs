//! Metrics computed from aggregated section values.

use crate::report::SectionTable;

/// RAM occupied by the binary relative to the RAM available to it.
///
/// RAM starts at `.relocate`; the heap is the last section placed before
/// `.dma`, so everything from `.relocate` to the end of `.heap` is in use and
/// everything from `.relocate` to the start of `.dma` is available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RamUsage {
    pub used: f64,
    pub total: f64,
}

impl RamUsage {
    pub fn from_sections(sections: &SectionTable) -> Self {
        let relocate = sections.address("relocate");
        Self {
            used: sections.address("heap") - relocate + sections.size("heap"),
            total: sections.address("dma") - relocate,
        }
    }

    /// `used / total`, with no guard on `total`.
    ///
    /// A zero total yields `+Inf`, `-Inf` or `NaN` following IEEE-754.
    pub fn ratio(&self) -> f64 {
        self.used / self.total
    }
}
