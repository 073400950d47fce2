//! Writing metrics files.

use anyhow::{Context, Result};
use fgoxide::io::DelimFile;
use std::path::Path;

use super::Metric;

/// Writes metrics to a TSV file with a header row named after the struct's fields.
///
/// # Errors
/// Returns an error if the file cannot be created or written to.
///
/// # Example
/// ```no_run
/// use seedgrow_lib::metrics::{IterationMetric, write_metrics};
///
/// let metrics = vec![IterationMetric { trim_length: 18, input_reads: 100, ..Default::default() }];
/// write_metrics("iterations.tsv", &metrics).unwrap();
/// ```
pub fn write_metrics<P: AsRef<Path>, T: Metric>(path: P, metrics: &[T]) -> Result<()> {
    let path_ref = path.as_ref();
    DelimFile::default().write_tsv(&path_ref, metrics).with_context(|| {
        format!("Failed to write {} metrics: {}", T::metric_name(), path_ref.display())
    })
}
