//! Opening BAM files for reading and writing.
//!
//! `threads` is the number of BGZF worker threads. With one thread (de)compression happens
//! inline on the calling thread; with more, noodles' multithreaded BGZF reader or writer is
//! used. Either way callers see a plain `noodles::bam` reader or writer.
//!
//! [`AtomicBamWriter`] writes to a temporary file next to its destination and only moves
//! it into place in [`AtomicBamWriter::finish`]. A writer that is dropped early leaves no
//! file behind.

use anyhow::{Context, Result};
use noodles::sam::Header;
use noodles::sam::alignment::io::Write as AlignmentWrite;
use noodles::sam::alignment::record_buf::RecordBuf;
use noodles_bgzf::io::{
    MultithreadedReader, MultithreadedWriter, Reader as BgzfReader, Writer as BgzfWriter,
};
use std::fs::File;
use std::io::{self, BufRead, Read, Write};
use std::num::NonZero;
use std::path::{Path, PathBuf};

use crate::staging::AtomicFile;

/// Worker threads to hand to a multithreaded BGZF codec, or `None` to work inline.
fn worker_count(threads: usize) -> Option<NonZero<usize>> {
    NonZero::new(threads).filter(|n| n.get() > 1)
}

/// Decompressed bytes of a BGZF file.
pub enum BgzfSource {
    /// Blocks are inflated on the calling thread.
    Inline(BgzfReader<File>),
    /// Blocks are inflated by a pool of worker threads.
    Workers(MultithreadedReader<File>),
}

impl BgzfSource {
    fn open(file: File, threads: usize) -> Self {
        match worker_count(threads) {
            Some(n) => Self::Workers(MultithreadedReader::with_worker_count(n, file)),
            None => Self::Inline(BgzfReader::new(file)),
        }
    }

    fn inner(&mut self) -> &mut dyn BufRead {
        match self {
            Self::Inline(r) => r,
            Self::Workers(r) => r,
        }
    }
}

impl Read for BgzfSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner().read(buf)
    }
}

impl BufRead for BgzfSource {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner().fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner().consume(amt);
    }
}

/// Compressed output of a BGZF file.
pub enum BgzfSink {
    /// Blocks are deflated on the calling thread.
    Inline(BgzfWriter<File>),
    /// Blocks are deflated by a pool of worker threads.
    Workers(MultithreadedWriter<File>),
}

impl BgzfSink {
    fn create(file: File, threads: usize) -> Self {
        match worker_count(threads) {
            Some(n) => Self::Workers(MultithreadedWriter::with_worker_count(n, file)),
            None => Self::Inline(BgzfWriter::new(file)),
        }
    }

    fn inner(&mut self) -> &mut dyn Write {
        match self {
            Self::Inline(w) => w,
            Self::Workers(w) => w,
        }
    }

    /// Flushes pending blocks and writes the BGZF EOF marker.
    ///
    /// # Errors
    /// Returns an error if a block cannot be written.
    pub fn finish(self) -> io::Result<()> {
        match self {
            Self::Inline(mut w) => w.try_finish(),
            Self::Workers(mut w) => w.finish()?.flush(),
        }
    }
}

impl Write for BgzfSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner().flush()
    }
}

/// A BAM reader over either kind of [`BgzfSource`].
pub type BamReader = noodles::bam::io::Reader<BgzfSource>;

type BamWriter = noodles::bam::io::Writer<BgzfSink>;

/// Opens a BAM file and reads its header.
///
/// # Errors
/// Returns an error if the file cannot be opened or its header cannot be read.
///
/// # Example
/// ```no_run
/// use seedgrow_lib::bam_io::create_bam_reader;
///
/// let (mut reader, header) = create_bam_reader("accepted_hits.bam", 1).unwrap();
/// ```
pub fn create_bam_reader<P: AsRef<Path>>(path: P, threads: usize) -> Result<(BamReader, Header)> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open input BAM: {}", path.display()))?;

    let mut reader = noodles::bam::io::Reader::from(BgzfSource::open(file, threads));
    let header = reader
        .read_header()
        .with_context(|| format!("Failed to read header from: {}", path.display()))?;
    Ok((reader, header))
}

/// A BAM writer whose output only appears at its destination once it is finished.
pub struct AtomicBamWriter {
    atomic: AtomicFile,
    writer: BamWriter,
    records_written: u64,
}

impl AtomicBamWriter {
    /// Create a writer for `path` and write `header`.
    ///
    /// # Errors
    /// Returns an error if the temporary file cannot be created or the header cannot be
    /// written.
    pub fn create<P: AsRef<Path>>(path: P, header: &Header, threads: usize) -> Result<Self> {
        let path = path.as_ref();
        let atomic = AtomicFile::create(path)?;
        let mut writer = noodles::bam::io::Writer::from(BgzfSink::create(atomic.file()?, threads));
        writer
            .write_header(header)
            .with_context(|| format!("Failed to write header to: {}", path.display()))?;
        Ok(Self { atomic, writer, records_written: 0 })
    }

    /// Write one record.
    ///
    /// # Errors
    /// Returns an error if the record cannot be encoded or written.
    pub fn write_record(&mut self, header: &Header, record: &RecordBuf) -> Result<()> {
        self.writer.write_alignment_record(header, record).with_context(|| {
            format!("Failed to write record to: {}", self.atomic.destination().display())
        })?;
        self.records_written += 1;
        Ok(())
    }

    /// Number of records written so far.
    #[must_use]
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Flush all data, write the EOF marker and move the file to its destination.
    ///
    /// # Errors
    /// Returns an error if finishing the BGZF stream or renaming the file fails.
    pub fn finish(self) -> Result<PathBuf> {
        let Self { atomic, writer, .. } = self;
        writer.into_inner().finish().with_context(|| {
            format!("Failed to finish output BAM: {}", atomic.destination().display())
        })?;
        atomic.commit()
    }
}
