//! Extract and truncate reads from FASTQ files.
//!
//! Runs the batch-building step of `resolve` on its own: every read (or only the reads named
//! in a file) is written with its sequence and qualities truncated to a fixed length.

use anyhow::Result;
use clap::Parser;
use log::info;
use seedgrow_lib::fastq::extract_subset;
use seedgrow_lib::logging::{OperationTimer, format_count};
use seedgrow_lib::read_filter::ReadFilter;
use seedgrow_lib::validation::{validate_file_exists, validate_positive};
use std::path::PathBuf;

use crate::commands::command::Command;
use crate::commands::common::FastqInputOptions;

/// Truncate reads to a seed length, optionally keeping only named reads.
#[derive(Debug, Parser)]
#[command(
    name = "trim",
    about = "\x1b[38;5;166m[UTILITIES]\x1b[0m      \x1b[36mTruncate FASTQ reads to a seed length\x1b[0m",
    long_about = r#"
Truncate FASTQ reads to a fixed seed length.

Reads from all inputs are written, in input order, to a single output FASTQ with their
sequence and quality strings truncated to --length bases. Reads that are already shorter
are written unchanged. With --read-names only the reads whose identifier is listed in the
file (one per line, as written by `seedgrow classify --multimapped-names`) are kept.

The output is gzip-compressed when its name ends in .gz, and only appears once every
input has been read successfully.

Example usage:
  seedgrow trim -i reads.fq.gz -o seeds.fq -l 18
  seedgrow trim -i a.fq b.fq -o multi19.fq -l 19 -n multimapped.txt
"#
)]
pub struct Trim {
    /// Input FASTQ options
    #[command(flatten)]
    pub input: FastqInputOptions,

    /// Output FASTQ file
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Length to truncate reads to
    #[arg(short = 'l', long = "length")]
    pub length: usize,

    /// File of read identifiers to keep, one per line
    #[arg(short = 'n', long = "read-names")]
    pub read_names: Option<PathBuf>,
}

impl Command for Trim {
    fn execute(&self, _command_line: &str) -> Result<()> {
        self.input.validate()?;
        validate_positive(self.length, "length")?;

        let filter = match &self.read_names {
            Some(path) => {
                validate_file_exists(path, "Read names")?;
                ReadFilter::from_names_file(path)?
            }
            None => ReadFilter::Unfiltered,
        };

        info!("Output: {}", self.output.display());
        info!("Length: {}", self.length);
        if let Some(n) = filter.len() {
            info!("Keeping {} named reads", format_count(n as u64));
        }

        let timer = OperationTimer::new("Trimming reads");
        let counts = extract_subset(&self.input.inputs, &filter, self.length, &self.output)?;
        info!(
            "Wrote {} of {} reads ({} truncated)",
            format_count(counts.records_written),
            format_count(counts.records_read),
            format_count(counts.records_truncated)
        );
        timer.log_completion(counts.records_written);
        Ok(())
    }
}
