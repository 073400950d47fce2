//! Metrics reported by seedgrow.
//!
//! - [`iteration`] - Per-iteration read counts of a resolve run
//! - [`writer`] - Metrics file I/O utilities

pub mod iteration;
pub mod writer;

use serde::{Deserialize, Serialize};

/// A metric type that can be serialized to TSV files.
pub trait Metric: Serialize + for<'de> Deserialize<'de> + Clone + Default {
    /// Human-readable name for this metric type, used in error messages.
    fn metric_name() -> &'static str;
}

pub use iteration::IterationMetric;
pub use writer::write_metrics;
