//! Partitioning aligned reads into uniquely aligned and multimapped.
//!
//! Classification reads the aligner's output twice. The first pass tallies, for every read
//! with at least one mapped record, how many records it has and the `NH` value they carry.
//! Each read's multiplicity is then decided by the [`MultiplicityMode`]. The second pass
//! copies every mapped record of a uniquely aligned read to the unique-only output.
//!
//! Unmapped records (flag `0x4`) are not alignments and are ignored.

use ahash::AHashMap;
use anyhow::{Context, Result};
use clap::ValueEnum;
use log::{info, warn};
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::RecordBuf;
use noodles::sam::alignment::record_buf::data::field::Value as BufValue;
use std::path::Path;

use crate::bam_io::{AtomicBamWriter, create_bam_reader};
use crate::errors::SeedgrowError;
use crate::header::ProgramInfo;
use crate::logging::format_count;
use crate::progress::ProgressTracker;
use crate::read_filter::ReadNameSet;

/// The number-of-hits tag set by TopHat and most other aligners.
pub const NH_TAG: Tag = Tag::new(b'N', b'H');

/// Where a read's number of alignments comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum MultiplicityMode {
    /// Use `NH` when present, otherwise count the read's mapped records.
    #[default]
    #[value(name = "auto")]
    Auto,
    /// Require `NH` on every mapped record.
    #[value(name = "tag")]
    Tag,
    /// Count the read's mapped records and ignore `NH`.
    #[value(name = "count")]
    Count,
}

/// The outcome for one read at one seed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadClass {
    /// No mapped record.
    Unaligned,
    /// Exactly one alignment.
    UniqueAligned,
    /// More than one alignment.
    Multimapped,
}

/// Read identifiers of one alignment output, partitioned by [`ReadClass`].
///
/// `unique` and `multimapped` are disjoint and together equal `aligned`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Reads with at least one mapped record.
    pub aligned: ReadNameSet,
    /// Aligned reads with multiplicity one.
    pub unique: ReadNameSet,
    /// Aligned reads with any other multiplicity.
    pub multimapped: ReadNameSet,
    /// Mapped records seen.
    pub mapped_records: u64,
    /// Reads whose multiplicity was counted because they had no `NH` tag.
    pub inferred_reads: u64,
}

impl Classification {
    /// The class of a read in this classification.
    #[must_use]
    pub fn class_of(&self, read_name: &[u8]) -> ReadClass {
        if self.unique.contains(read_name) {
            ReadClass::UniqueAligned
        } else if self.multimapped.contains(read_name) {
            ReadClass::Multimapped
        } else {
            ReadClass::Unaligned
        }
    }
}

/// Mapped records and `NH` value seen for one read.
#[derive(Debug, Default)]
struct ReadTally {
    records: u64,
    hit_count: Option<i64>,
}

impl ReadTally {
    fn multiplicity(&self, mode: MultiplicityMode) -> (i64, bool) {
        let counted = i64::try_from(self.records).unwrap_or(i64::MAX);
        match (mode, self.hit_count) {
            (MultiplicityMode::Count, _) => (counted, false),
            (_, Some(nh)) => (nh, false),
            (_, None) => (counted, true),
        }
    }
}

/// Returns the integer value of a record's `NH` tag, if it has one.
#[must_use]
pub fn hit_count(record: &RecordBuf) -> Option<i64> {
    match record.data().get(&NH_TAG)? {
        BufValue::Int8(v) => Some(i64::from(*v)),
        BufValue::UInt8(v) => Some(i64::from(*v)),
        BufValue::Int16(v) => Some(i64::from(*v)),
        BufValue::UInt16(v) => Some(i64::from(*v)),
        BufValue::Int32(v) => Some(i64::from(*v)),
        BufValue::UInt32(v) => Some(i64::from(*v)),
        _ => None,
    }
}

/// Tallies the mapped records of an alignment file and partitions its reads.
///
/// # Errors
/// Returns an error if the file cannot be read, or in [`MultiplicityMode::Tag`] if a
/// mapped record has no `NH` tag.
pub fn tally_alignments<P: AsRef<Path>>(
    input: P,
    mode: MultiplicityMode,
    threads: usize,
) -> Result<Classification> {
    let input = input.as_ref();
    let (mut reader, header) = create_bam_reader(input, threads)?;
    let progress = ProgressTracker::new("Tallied records").with_interval(1_000_000);

    let mut tallies: AHashMap<Vec<u8>, ReadTally> = AHashMap::new();
    let mut mapped_records = 0u64;

    for result in reader.record_bufs(&header) {
        let record = result
            .with_context(|| format!("Failed to read record from: {}", input.display()))?;
        progress.log_if_needed(1);

        if record.flags().is_unmapped() {
            continue;
        }
        let Some(name) = record.name() else {
            continue;
        };

        let nh = hit_count(&record);
        if mode == MultiplicityMode::Tag && nh.is_none() {
            return Err(SeedgrowError::MissingMultiplicityTag {
                read_name: name.to_string(),
                path: input.display().to_string(),
            }
            .into());
        }

        let tally = tallies.entry(name.to_vec()).or_default();
        tally.records += 1;
        if let Some(nh) = nh {
            tally.hit_count = Some(tally.hit_count.map_or(nh, |seen| seen.max(nh)));
        }
        mapped_records += 1;
    }
    progress.log_final();

    let mut classification = Classification { mapped_records, ..Classification::default() };
    for (name, tally) in tallies {
        let (multiplicity, inferred) = tally.multiplicity(mode);
        if inferred {
            classification.inferred_reads += 1;
        }
        if multiplicity == 1 {
            classification.unique.insert(name.clone());
        } else {
            classification.multimapped.insert(name.clone());
        }
        classification.aligned.insert(name);
    }

    if classification.inferred_reads > 0 {
        warn!(
            "{} aligned reads in {} had no NH tag; their alignments were counted instead",
            format_count(classification.inferred_reads),
            input.display()
        );
    }

    Ok(classification)
}

/// Copies every mapped record of the reads in `names` from `input` to `output`.
///
/// The output keeps the input header with a `@PG` record appended. Returns the number of
/// records written.
///
/// # Errors
/// Returns an error if either file cannot be read or written.
pub fn write_records_for_reads<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    names: &ReadNameSet,
    threads: usize,
    program: &ProgramInfo,
) -> Result<u64> {
    let input = input.as_ref();
    let (mut reader, header) = create_bam_reader(input, threads)?;
    let out_header = program.stamp(header.clone())?;
    let mut writer = AtomicBamWriter::create(output, &out_header, threads)?;

    for result in reader.record_bufs(&header) {
        let record = result
            .with_context(|| format!("Failed to read record from: {}", input.display()))?;
        if !record.flags().is_unmapped()
            && record.name().is_some_and(|name| names.contains::<[u8]>(name))
        {
            writer.write_record(&out_header, &record)?;
        }
    }

    let written = writer.records_written();
    writer.finish()?;
    Ok(written)
}

/// Classifies the reads of an alignment file and writes the records of the uniquely
/// aligned reads to `unique_output`.
///
/// # Errors
/// Returns an error if the input cannot be read, the output cannot be written, or in
/// [`MultiplicityMode::Tag`] if a mapped record has no `NH` tag.
pub fn classify_alignments<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    unique_output: Q,
    mode: MultiplicityMode,
    threads: usize,
    program: &ProgramInfo,
) -> Result<Classification> {
    let input = input.as_ref();
    let classification = tally_alignments(input, mode, threads)?;
    let written =
        write_records_for_reads(input, unique_output, &classification.unique, threads, program)?;

    info!(
        "Classified {} aligned reads: {} unique ({} records), {} multimapped",
        format_count(classification.aligned.len() as u64),
        format_count(classification.unique.len() as u64),
        format_count(written),
        format_count(classification.multimapped.len() as u64),
    );
    Ok(classification)
}
