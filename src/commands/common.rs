//! Common CLI options shared across commands.
//!
//! This module provides shared argument structures that can be composed into
//! command structs using `#[command(flatten)]`.

use std::path::PathBuf;

use clap::Args;

use seedgrow_lib::classify::MultiplicityMode;
use seedgrow_lib::header::ProgramInfo;
use seedgrow_lib::validation::{validate_file_exists, validate_positive};

/// Source FASTQ files.
#[derive(Debug, Clone, Args)]
pub struct FastqInputOptions {
    /// Input FASTQ files (plain or gzipped), read in the order given
    #[arg(short = 'i', long = "input", required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,
}

impl FastqInputOptions {
    /// Validates that every input file exists.
    ///
    /// # Errors
    ///
    /// Returns an error for the first input that does not exist.
    pub fn validate(&self) -> anyhow::Result<()> {
        for input in &self.inputs {
            validate_file_exists(input, "Input FASTQ")?;
        }
        Ok(())
    }
}

/// Options controlling how a read's number of alignments is determined.
#[derive(Debug, Clone, Default, Args)]
pub struct MultiplicityOptions {
    /// Where the number of alignments comes from: the NH tag (`tag`), the number of mapped
    /// records (`count`), or NH when present and the record count otherwise (`auto`)
    #[arg(long = "multiplicity", value_enum, default_value_t = MultiplicityMode::Auto)]
    pub multiplicity: MultiplicityMode,
}

/// Threads for BGZF compression and decompression of BAM files.
#[derive(Debug, Clone, Args)]
pub struct IoThreadsOptions {
    /// Worker threads used to read and write BAM files
    #[arg(long = "io-threads", default_value = "1")]
    pub io_threads: usize,
}

impl Default for IoThreadsOptions {
    fn default() -> Self {
        Self { io_threads: 1 }
    }
}

impl IoThreadsOptions {
    /// Validates that at least one thread was requested.
    ///
    /// # Errors
    ///
    /// Returns an error if `--io-threads` is zero.
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_positive(self.io_threads, "io-threads")?;
        Ok(())
    }
}

/// The provenance of this invocation, for `@PG` records.
pub fn program_info(command_line: &str) -> ProgramInfo {
    ProgramInfo::new(crate::version::VERSION.as_str(), command_line)
}
