//! Gauge registry and Prometheus text exposition.
//!
//! ```text
//! GaugeVec ──register──▶ Registry ──encode_text──▶ String ──write_textfile──▶ out.prom
//! ```
//!
//! The registry is built fresh for every run and written exactly once.

pub mod exposition;
pub mod registry;
pub mod textfile;

use std::io;

pub use exposition::{encode_text, format_value};
pub use registry::{GaugeVec, Registry};
pub use textfile::write_textfile;

/// Error type for metric registration and export.
///
/// `InvalidName`, `Duplicate` and `LabelArity` are the conditions the Go
/// client library panics on in `MustRegister` and `WithLabelValues`. The
/// exporter's own families are constant and never hit them; they guard the
/// public `GaugeVec`/`Registry` API.
#[derive(Debug)]
pub enum MetricsError {
    /// Metric or label name is not a valid Prometheus identifier.
    InvalidName(String),
    /// A family with this name is already registered.
    Duplicate(String),
    /// Wrong number of label values passed to `GaugeVec::set`.
    LabelArity {
        name: String,
        expected: usize,
        got: usize,
    },
    /// I/O error writing the textfile.
    Io(io::Error),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::InvalidName(name) => write!(f, "invalid metric or label name '{}'", name),
            MetricsError::Duplicate(name) => write!(f, "metric '{}' already registered", name),
            MetricsError::LabelArity {
                name,
                expected,
                got,
            } => write!(
                f,
                "metric '{}' expects {} label values, got {}",
                name, expected, got
            ),
            MetricsError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for MetricsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MetricsError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MetricsError {
    fn from(e: io::Error) -> Self {
        MetricsError::Io(e)
    }
}
