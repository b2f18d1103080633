//! Per-section accumulation of parsed report records.

use std::collections::BTreeMap;

use super::parser::SectionRecord;

/// Sections the derived RAM calculation reads. Always present, even if the
/// report never mentions them.
pub const WELL_KNOWN_SECTIONS: [&str; 3] = ["dma", "heap", "relocate"];

/// Address and size of every section seen in a report.
///
/// Repeated labels are last-write-wins.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionTable {
    addresses: BTreeMap<String, f64>,
    sizes: BTreeMap<String, f64>,
}

impl Default for SectionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionTable {
    /// Creates a table seeded with the well-known sections at zero.
    pub fn new() -> Self {
        let mut addresses = BTreeMap::new();
        let mut sizes = BTreeMap::new();
        for label in WELL_KNOWN_SECTIONS {
            addresses.insert(label.to_string(), 0.0);
            sizes.insert(label.to_string(), 0.0);
        }
        Self { addresses, sizes }
    }

    /// Stores a record, replacing any earlier values for the same label.
    pub fn record(&mut self, rec: SectionRecord) {
        self.sizes.insert(rec.label.clone(), rec.size);
        self.addresses.insert(rec.label, rec.address);
    }

    /// Address of `label`, or 0 if unknown.
    pub fn address(&self, label: &str) -> f64 {
        self.addresses.get(label).copied().unwrap_or(0.0)
    }

    /// Size of `label`, or 0 if unknown.
    pub fn size(&self, label: &str) -> f64 {
        self.sizes.get(label).copied().unwrap_or(0.0)
    }

    pub fn addresses(&self) -> &BTreeMap<String, f64> {
        &self.addresses
    }

    pub fn sizes(&self) -> &BTreeMap<String, f64> {
        &self.sizes
    }

    /// Number of distinct section labels, seeded ones included.
    pub fn label_count(&self) -> usize {
        self.addresses.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(label: &str, size: f64, address: f64) -> SectionRecord {
        SectionRecord {
            label: label.to_string(),
            size,
            address,
        }
    }

    #[test]
    fn test_new_table_is_seeded() {
        let table = SectionTable::new();
        assert_eq!(table.label_count(), 3);
        for label in WELL_KNOWN_SECTIONS {
            assert_eq!(table.addresses().get(label), Some(&0.0));
            assert_eq!(table.sizes().get(label), Some(&0.0));
        }
    }

    #[test]
    fn test_record_inserts_new_label() {
        let mut table = SectionTable::new();
        table.record(rec("text", 4096.0, 134217728.0));

        assert_eq!(table.label_count(), 4);
        assert_eq!(table.size("text"), 4096.0);
        assert_eq!(table.address("text"), 134217728.0);
    }

    #[test]
    fn test_last_write_wins() {
        let mut table = SectionTable::new();
        table.record(rec("heap", 10.0, 100.0));
        table.record(rec("heap", 64.0, 300.0));

        assert_eq!(table.label_count(), 3);
        assert_eq!(table.size("heap"), 64.0);
        assert_eq!(table.address("heap"), 300.0);
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        let mut table = SectionTable::new();
        table.record(rec("Heap", 1.0, 2.0));

        assert_eq!(table.label_count(), 4);
        assert_eq!(table.size("heap"), 0.0);
        assert_eq!(table.size("Heap"), 1.0);
    }

    #[test]
    fn test_unknown_label_reads_zero() {
        let table = SectionTable::new();
        assert_eq!(table.address("bss"), 0.0);
        assert_eq!(table.size("bss"), 0.0);
    }
}
