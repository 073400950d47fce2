//! Detection of lost multimappers.
//!
//! A read is lost when it was multimapped at one seed length and produced no alignment at
//! all when re-aligned with the next, longer seed. Its records from the earlier alignment
//! are the only placement information left for it, so they are written to their own BAM.

use anyhow::Result;
use log::info;
use std::path::Path;

use crate::classify::{Classification, ReadClass, write_records_for_reads};
use crate::header::ProgramInfo;
use crate::logging::format_count;
use crate::read_filter::ReadNameSet;

/// Counts produced by one call to [`split_lost_multimappers`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LostCounts {
    /// Reads that were lost
    pub reads: u64,
    /// Records of lost reads written to the output
    pub records: u64,
}

/// Reads in `previous_multimapped` that are [`ReadClass::Unaligned`] in `next`.
#[must_use]
pub fn lost_reads(previous_multimapped: &ReadNameSet, next: &Classification) -> ReadNameSet {
    previous_multimapped
        .iter()
        .filter(|name| next.class_of(name) == ReadClass::Unaligned)
        .cloned()
        .collect()
}

/// Writes the records of `previous_alignments` whose read was multimapped there and did
/// not align in the next iteration.
///
/// The output is always written, even when no read was lost, and keeps the header of
/// `previous_alignments` with a `@PG` record appended.
///
/// # Errors
/// Returns an error if the alignments cannot be read or the output cannot be written.
pub fn split_lost_multimappers<P: AsRef<Path>, Q: AsRef<Path>>(
    previous_alignments: P,
    previous_multimapped: &ReadNameSet,
    next: &Classification,
    output: Q,
    threads: usize,
    program: &ProgramInfo,
) -> Result<LostCounts> {
    let lost = lost_reads(previous_multimapped, next);
    let records =
        write_records_for_reads(previous_alignments, output, &lost, threads, program)?;

    let counts = LostCounts { reads: lost.len() as u64, records };
    info!(
        "Found {} lost multimappers ({} records)",
        format_count(counts.reads),
        format_count(counts.records)
    );
    Ok(counts)
}
