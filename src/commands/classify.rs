//! Split an alignment file into uniquely aligned and multimapped reads.

use anyhow::Result;
use clap::Parser;
use log::info;
use seedgrow_lib::classify::classify_alignments;
use seedgrow_lib::logging::OperationTimer;
use seedgrow_lib::read_filter::write_read_names;
use seedgrow_lib::validation::validate_file_exists;
use std::path::PathBuf;

use crate::commands::command::Command;
use crate::commands::common::{IoThreadsOptions, MultiplicityOptions, program_info};

/// Classify the reads of a BAM as unique or multimapped.
#[derive(Debug, Parser)]
#[command(
    name = "classify",
    about = "\x1b[38;5;72m[ALIGNMENT]\x1b[0m      \x1b[36mSplit uniquely aligned reads from multimappers\x1b[0m",
    long_about = r#"
Classify the reads of an alignment file as uniquely aligned or multimapped.

Every record of a read with exactly one alignment is written to --unique, keeping the
input header. Unmapped records are ignored. With --multimapped-names the identifiers of
the multimapped reads are written one per line, ready to be passed to `seedgrow trim -n`.

The number of alignments of a read is taken from its NH tag, or from the number of its
mapped records; see --multiplicity.

Example usage:
  seedgrow classify -i accepted_hits.bam -u unique.bam
  seedgrow classify -i accepted_hits.bam -u unique.bam --multimapped-names multi.txt
"#
)]
pub struct Classify {
    /// Input BAM file of alignments
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Output BAM file for the records of uniquely aligned reads
    #[arg(short = 'u', long = "unique")]
    pub unique: PathBuf,

    /// Optional output file for the identifiers of multimapped reads
    #[arg(long = "multimapped-names")]
    pub multimapped_names: Option<PathBuf>,

    /// Multiplicity options
    #[command(flatten)]
    pub multiplicity: MultiplicityOptions,

    /// BAM threading options
    #[command(flatten)]
    pub io: IoThreadsOptions,
}

impl Command for Classify {
    fn execute(&self, command_line: &str) -> Result<()> {
        validate_file_exists(&self.input, "Input BAM")?;
        self.io.validate()?;

        info!("Input: {}", self.input.display());
        info!("Unique output: {}", self.unique.display());
        info!("Multiplicity: {:?}", self.multiplicity.multiplicity);

        let timer = OperationTimer::new("Classifying alignments");
        let classification = classify_alignments(
            &self.input,
            &self.unique,
            self.multiplicity.multiplicity,
            self.io.io_threads,
            &program_info(command_line),
        )?;

        if let Some(path) = &self.multimapped_names {
            write_read_names(path, &classification.multimapped)?;
            info!("Wrote multimapped read names to {}", path.display());
        }

        timer.log_completion(classification.mapped_records);
        Ok(())
    }
}
