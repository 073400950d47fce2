//! Per-iteration counts of a resolve run.

use serde::{Deserialize, Serialize};

use super::Metric;

/// Read counts for one seed length.
///
/// One row per iteration is written to `iterations.tsv`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationMetric {
    /// Seed length reads were truncated to.
    pub trim_length: usize,
    /// Reads in the batch handed to the aligner.
    pub input_reads: u64,
    /// Distinct reads with at least one alignment.
    pub aligned_reads: u64,
    /// Aligned reads with exactly one alignment.
    pub unique_reads: u64,
    /// Aligned reads with more than one alignment; these make up the next batch.
    pub multimapped_reads: u64,
    /// Reads multimapped at this length that produced no alignment at the next one.
    pub lost_multimappers: u64,
}

impl Metric for IterationMetric {
    fn metric_name() -> &'static str {
        "iteration"
    }
}

impl IterationMetric {
    /// Reads in the batch that produced no alignment.
    #[must_use]
    pub fn unaligned_reads(&self) -> u64 {
        self.input_reads.saturating_sub(self.aligned_reads)
    }
}
