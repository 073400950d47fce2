//! Helpers for building small BAM files in tests.
//!
//! These are used by the unit tests in this crate and by the integration tests, so they
//! live in the library rather than behind `#[cfg(test)]`.

use anyhow::{Context, Result};
use bstr::BString;
use noodles::core::Position;
use noodles::sam::Header;
use noodles::sam::alignment::io::Write as AlignmentWrite;
use noodles::sam::alignment::record::Flags;
use noodles::sam::alignment::record::cigar::Op;
use noodles::sam::alignment::record::cigar::op::Kind;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::data::field::Value as BufValue;
use noodles::sam::alignment::record_buf::{QualityScores, RecordBuf, Sequence};
use noodles::sam::header::record::value::Map;
use noodles::sam::header::record::value::map::ReferenceSequence;
use std::fs::File;
use std::num::NonZeroUsize;
use std::path::Path;

use crate::bam_io::create_bam_reader;

/// Name of the single reference sequence in [`test_header`].
pub const TEST_CONTIG: &str = "chr1";

const READ_LENGTH: usize = 20;

/// A header with one 10 kb reference sequence.
///
/// # Panics
/// Never; the reference length is a non-zero constant.
#[must_use]
pub fn test_header() -> Header {
    let reference_sequence =
        Map::<ReferenceSequence>::new(NonZeroUsize::new(10_000).expect("non-zero length"));
    Header::builder().add_reference_sequence(BString::from(TEST_CONTIG), reference_sequence).build()
}

/// A mapped single-end record at position 100 with an optional NH tag.
#[must_use]
pub fn mapped_record(name: &str, hit_count: Option<i32>) -> RecordBuf {
    mapped_record_at(name, hit_count, 100)
}

/// A mapped single-end record at the given 1-based position with an optional NH tag.
///
/// # Panics
/// Panics if `position` is zero.
#[must_use]
pub fn mapped_record_at(name: &str, hit_count: Option<i32>, position: usize) -> RecordBuf {
    let mut record = RecordBuf::default();
    *record.name_mut() = Some(name.into());
    *record.flags_mut() = Flags::empty();
    *record.reference_sequence_id_mut() = Some(0);
    *record.alignment_start_mut() =
        Some(Position::try_from(position).expect("position must be >= 1"));
    *record.cigar_mut() = [Op::new(Kind::Match, READ_LENGTH)].into_iter().collect();
    *record.sequence_mut() = Sequence::from(b"ACGT".repeat(READ_LENGTH / 4));
    *record.quality_scores_mut() = QualityScores::from(vec![30; READ_LENGTH]);
    if let Some(nh) = hit_count {
        record.data_mut().insert(Tag::new(b'N', b'H'), BufValue::from(nh));
    }
    record
}

/// The records an aligner reports for one read with `hits` equally good positions, each
/// carrying `NH:i:<hits>`.
#[must_use]
pub fn read_hits(name: &str, hits: usize) -> Vec<RecordBuf> {
    let nh = i32::try_from(hits).unwrap_or(i32::MAX);
    (0..hits).map(|i| mapped_record_at(name, Some(nh), 100 + 50 * i)).collect()
}

/// An unmapped record.
#[must_use]
pub fn unmapped_record(name: &str) -> RecordBuf {
    let mut record = RecordBuf::default();
    *record.name_mut() = Some(name.into());
    *record.flags_mut() = Flags::UNMAPPED;
    *record.sequence_mut() = Sequence::from(b"ACGT".repeat(READ_LENGTH / 4));
    *record.quality_scores_mut() = QualityScores::from(vec![30; READ_LENGTH]);
    record
}

/// Writes `records` to a BAM at `path` using [`test_header`].
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_test_bam<P: AsRef<Path>>(path: P, records: &[RecordBuf]) -> Result<()> {
    let path = path.as_ref();
    let header = test_header();
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = noodles::bam::io::Writer::new(file);
    writer.write_header(&header)?;
    for record in records {
        writer.write_alignment_record(&header, record)?;
    }
    writer.finish(&header)?;
    Ok(())
}

/// Reads the query names of every record in a BAM, in file order.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn bam_names<P: AsRef<Path>>(path: P, threads: usize) -> Result<Vec<String>> {
    let (mut reader, header) = create_bam_reader(path, threads)?;
    let mut names = Vec::new();
    for result in reader.record_bufs(&header) {
        let record = result?;
        names.push(record.name().map(ToString::to_string).unwrap_or_default());
    }
    Ok(names)
}
