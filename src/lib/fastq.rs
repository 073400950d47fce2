//! FASTQ subset extraction and seed trimming.
//!
//! Builds the input batch for one iteration: the reads of one or more source FASTQs that
//! pass a [`ReadFilter`], with sequence and qualities truncated to the iteration's seed
//! length. Sources are streamed one record at a time, in the order they are supplied.
//!
//! Plain and gzip-compressed sources are both accepted (detected from the file
//! extension). The output is gzip-compressed when its name ends in `.gz`.
//!
//! # Example
//!
//! ```no_run
//! use seedgrow_lib::fastq::extract_subset;
//! use seedgrow_lib::read_filter::ReadFilter;
//!
//! # fn main() -> anyhow::Result<()> {
//! let counts = extract_subset(&["reads.fq.gz"], &ReadFilter::Unfiltered, 18, "iter.fq")?;
//! println!("wrote {} of {} reads", counts.records_written, counts.records_read);
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use fgoxide::io::Io;
use flate2::Compression;
use flate2::write::GzEncoder;
use seq_io::fastq::Reader as FastqReader;
use seq_io::fastq::Record;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use crate::errors::SeedgrowError;
use crate::progress::ProgressTracker;
use crate::read_filter::{ReadFilter, read_name_from_header};
use crate::staging::AtomicFile;

const BUFFER_SIZE: usize = 1024 * 1024;

/// Counts produced by one call to [`extract_subset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubsetCounts {
    /// Records read across all sources
    pub records_read: u64,
    /// Records that passed the filter and were written
    pub records_written: u64,
    /// Written records that were longer than the target length
    pub records_truncated: u64,
}

/// Opens a FASTQ file, decompressing it if its name ends in `.gz`.
///
/// # Errors
/// Returns an error if the file cannot be opened.
pub fn open_fastq_reader(path: &Path) -> Result<Box<dyn BufRead + Send>> {
    let fgio = Io::new(5, BUFFER_SIZE);
    fgio.new_reader(&path).with_context(|| format!("Failed to open FASTQ: {}", path.display()))
}

/// Truncates a read's sequence and qualities to at most `length` symbols.
///
/// Reads that are already no longer than `length` are returned unchanged.
///
/// # Example
/// ```
/// use seedgrow_lib::fastq::truncate_read;
///
/// assert_eq!(truncate_read(b"ACGTACGT", b"IIIIHHHH", 4), (&b"ACGT"[..], &b"IIII"[..]));
/// assert_eq!(truncate_read(b"ACG", b"III", 4), (&b"ACG"[..], &b"III"[..]));
/// ```
#[must_use]
pub fn truncate_read<'a>(seq: &'a [u8], qual: &'a [u8], length: usize) -> (&'a [u8], &'a [u8]) {
    (&seq[..seq.len().min(length)], &qual[..qual.len().min(length)])
}

/// FASTQ output that is either plain text or gzip-compressed.
enum FastqOutput {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl FastqOutput {
    fn new(file: File, compressed: bool) -> Self {
        let buf = BufWriter::with_capacity(BUFFER_SIZE, file);
        if compressed {
            Self::Gzip(GzEncoder::new(buf, Compression::new(5)))
        } else {
            Self::Plain(buf)
        }
    }

    fn write_record(&mut self, head: &[u8], seq: &[u8], qual: &[u8]) -> std::io::Result<()> {
        match self {
            Self::Plain(w) => write_record_to(w, head, seq, qual),
            Self::Gzip(w) => write_record_to(w, head, seq, qual),
        }
    }

    fn finish(self) -> std::io::Result<()> {
        match self {
            Self::Plain(mut w) => w.flush(),
            Self::Gzip(w) => w.finish()?.flush(),
        }
    }
}

/// Writes one FASTQ record. `head` is the header line without the leading '@'.
fn write_record_to<W: Write>(
    writer: &mut W,
    head: &[u8],
    seq: &[u8],
    qual: &[u8],
) -> std::io::Result<()> {
    writer.write_all(b"@")?;
    writer.write_all(head)?;
    writer.write_all(b"\n")?;
    writer.write_all(seq)?;
    writer.write_all(b"\n+\n")?;
    writer.write_all(qual)?;
    writer.write_all(b"\n")
}

/// Writes the reads of `inputs` that pass `filter`, truncated to `length`, to `output`.
///
/// The output only appears once every source has been read successfully; a malformed
/// record in any source aborts the call and leaves no output behind.
///
/// # Errors
/// Returns an error if `length` is zero, a source cannot be read, a source contains a
/// malformed record, or the output cannot be written.
pub fn extract_subset<P: AsRef<Path>, Q: AsRef<Path>>(
    inputs: &[P],
    filter: &ReadFilter,
    length: usize,
    output: Q,
) -> Result<SubsetCounts> {
    let output = output.as_ref();
    if length == 0 {
        return Err(SeedgrowError::InvalidParameter {
            parameter: "length".to_string(),
            reason: "Must be positive (> 0), got: 0".to_string(),
        }
        .into());
    }

    let atomic = AtomicFile::create(output)?;
    let compressed = output.extension().is_some_and(|ext| ext == "gz");
    let mut writer = FastqOutput::new(atomic.file()?, compressed);

    let mut counts = SubsetCounts::default();
    let progress = ProgressTracker::new("Scanned reads").with_interval(1_000_000);

    for input in inputs {
        let input = input.as_ref();
        let mut reader = FastqReader::with_capacity(open_fastq_reader(input)?, BUFFER_SIZE);

        while let Some(result) = reader.next() {
            let record = result.map_err(|e| SeedgrowError::InvalidFileFormat {
                file_type: "FASTQ".to_string(),
                path: input.display().to_string(),
                reason: e.to_string(),
            })?;
            counts.records_read += 1;
            progress.log_if_needed(1);

            if !filter.includes(read_name_from_header(record.head())) {
                continue;
            }

            let (seq, qual) = truncate_read(record.seq(), record.qual(), length);
            if seq.len() < record.seq().len() {
                counts.records_truncated += 1;
            }
            writer
                .write_record(record.head(), seq, qual)
                .with_context(|| format!("Failed to write FASTQ: {}", output.display()))?;
            counts.records_written += 1;
        }
    }
    progress.log_final();

    writer.finish().with_context(|| format!("Failed to finish FASTQ: {}", output.display()))?;
    atomic.commit()?;

    Ok(counts)
}
