//! Read identifier sets and the filter that selects which reads enter an iteration.
//!
//! Read identifiers are stored as raw bytes: FASTQ headers and BAM query names are
//! both byte strings and are compared without any decoding.

use ahash::AHashSet;
use anyhow::{Context, Result};
use bstr::ByteSlice;
use fgoxide::io::Io;
use std::path::Path;

/// A set of read identifiers.
pub type ReadNameSet = AHashSet<Vec<u8>>;

/// Which reads of the source FASTQs are included in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReadFilter {
    /// Every read is included (first iteration).
    #[default]
    Unfiltered,
    /// Only reads whose identifier is in the set are included.
    Identifiers(ReadNameSet),
}

impl ReadFilter {
    /// Returns true if the read with this identifier passes the filter.
    #[must_use]
    pub fn includes(&self, read_name: &[u8]) -> bool {
        match self {
            Self::Unfiltered => true,
            Self::Identifiers(names) => names.contains(read_name),
        }
    }

    /// Number of identifiers in the filter, or `None` when unfiltered.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Unfiltered => None,
            Self::Identifiers(names) => Some(names.len()),
        }
    }

    /// Returns true if the filter can never include a read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Loads a filter from a file with one read identifier per line (plain or gzipped).
    ///
    /// Blank lines are ignored and a leading `@` is stripped so that FASTQ header lines
    /// can be used directly.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub fn from_names_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let lines = Io::default()
            .read_lines(&path)
            .with_context(|| format!("Failed to read read names from: {}", path.display()))?;

        let names = lines
            .iter()
            .map(|line| read_name_from_header(line.as_bytes()))
            .filter(|name| !name.is_empty())
            .map(<[u8]>::to_vec)
            .collect();
        Ok(Self::Identifiers(names))
    }
}

/// Extracts the read identifier from a FASTQ header: the first whitespace-delimited token,
/// without the leading `@` if one is present.
///
/// # Example
/// ```
/// use seedgrow_lib::read_filter::read_name_from_header;
///
/// assert_eq!(read_name_from_header(b"@read1 1:N:0:ACGT"), b"read1");
/// assert_eq!(read_name_from_header(b"read2\tcomment"), b"read2");
/// ```
#[must_use]
pub fn read_name_from_header(header: &[u8]) -> &[u8] {
    let header = header.strip_prefix(b"@").unwrap_or(header);
    header.fields().next().unwrap_or_default()
}

/// Writes a set of read identifiers to a file, one per line, in sorted order.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_read_names<P: AsRef<Path>>(path: P, names: &ReadNameSet) -> Result<()> {
    let path = path.as_ref();
    let mut sorted: Vec<&Vec<u8>> = names.iter().collect();
    sorted.sort_unstable();
    let lines: Vec<String> =
        sorted.into_iter().map(|name| name.to_str_lossy().into_owned()).collect();
    Io::default()
        .write_lines(&path, lines)
        .with_context(|| format!("Failed to write read names to: {}", path.display()))
}
