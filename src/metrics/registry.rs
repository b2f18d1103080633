//! Gauge families and the registry that owns them.

use std::collections::BTreeMap;

use super::MetricsError;

/// A named gauge family with a fixed set of label names.
///
/// A family with no label names holds at most one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeVec {
    name: String,
    help: String,
    label_names: Vec<String>,
    /// Keyed by label values in `label_names` order.
    samples: BTreeMap<Vec<String>, f64>,
}

impl GaugeVec {
    pub fn new(name: &str, help: &str, label_names: &[&str]) -> Result<Self, MetricsError> {
        if !is_valid_metric_name(name) {
            return Err(MetricsError::InvalidName(name.to_string()));
        }
        for label in label_names {
            if !is_valid_label_name(label) {
                return Err(MetricsError::InvalidName(label.to_string()));
            }
        }
        Ok(Self {
            name: name.to_string(),
            help: help.to_string(),
            label_names: label_names.iter().map(|s| s.to_string()).collect(),
            samples: BTreeMap::new(),
        })
    }

    /// Creates a family without labels.
    pub fn unlabeled(name: &str, help: &str) -> Result<Self, MetricsError> {
        Self::new(name, help, &[])
    }

    /// Sets the sample identified by `label_values`, replacing any previous value.
    pub fn set(&mut self, label_values: &[&str], value: f64) -> Result<(), MetricsError> {
        if label_values.len() != self.label_names.len() {
            return Err(MetricsError::LabelArity {
                name: self.name.clone(),
                expected: self.label_names.len(),
                got: label_values.len(),
            });
        }
        let key = label_values.iter().map(|s| s.to_string()).collect();
        self.samples.insert(key, value);
        Ok(())
    }

    pub fn get(&self, label_values: &[&str]) -> Option<f64> {
        let key: Vec<String> = label_values.iter().map(|s| s.to_string()).collect();
        self.samples.get(&key).copied()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    /// Samples as `(label values, value)` pairs, ordered by label values.
    pub fn samples(&self) -> impl Iterator<Item = (&[String], f64)> {
        self.samples.iter().map(|(k, v)| (k.as_slice(), *v))
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Collection of gauge families, ordered by name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    families: BTreeMap<String, GaugeVec>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, family: GaugeVec) -> Result<(), MetricsError> {
        if self.families.contains_key(family.name()) {
            return Err(MetricsError::Duplicate(family.name().to_string()));
        }
        self.families.insert(family.name().to_string(), family);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&GaugeVec> {
        self.families.get(name)
    }

    pub fn families(&self) -> impl Iterator<Item = &GaugeVec> {
        self.families.values()
    }

    /// Total number of samples across all families.
    pub fn sample_count(&self) -> usize {
        self.families.values().map(GaugeVec::len).sum()
    }
}

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`, excluding the reserved `__` prefix.
fn is_valid_label_name(name: &str) -> bool {
    if name.starts_with("__") {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
