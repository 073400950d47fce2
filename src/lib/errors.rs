//! Custom error types for seedgrow operations.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Result type alias for seedgrow operations
pub type Result<T> = std::result::Result<T, SeedgrowError>;

/// Error type for seedgrow operations
#[derive(Error, Debug)]
pub enum SeedgrowError {
    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// File format error
    #[error("Invalid {file_type} file '{path}': {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "BAM", "FASTQ")
        file_type: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// The external aligner exited unsuccessfully
    #[error("Aligner '{program}' failed with {status}")]
    AlignerFailed {
        /// The program that was run
        program: String,
        /// Exit status reported by the operating system
        status: ExitStatus,
    },

    /// The external aligner exited cleanly but did not produce its alignments
    #[error("Aligner finished but expected output '{}' does not exist", path.display())]
    MissingAlignmentOutput {
        /// Path that was expected to exist
        path: PathBuf,
    },

    /// A mapped record had no NH tag while multiplicity was required to come from the tag
    #[error("Read '{read_name}' in '{path}' has no NH tag")]
    MissingMultiplicityTag {
        /// Query name of the offending record
        read_name: String,
        /// Alignment file being classified
        path: String,
    },
}
