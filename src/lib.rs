//! elfprom - binary memory report to Prometheus textfile exporter.
//!
//! Reads the section table printed by a firmware build's size analysis step
//! and writes section addresses, sizes and a derived RAM usage ratio as
//! gauges for node_exporter's textfile collector.
//!
//! - `report` — line parser and per-section aggregation
//! - `derived` — RAM usage ratio
//! - `metrics` — gauge registry, text exposition, atomic textfile writer
//! - `settings` — resolved run configuration
//! - `pipeline` — one complete run

pub mod derived;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod settings;

pub use pipeline::{RunError, RunSummary, run};
pub use settings::Settings;
