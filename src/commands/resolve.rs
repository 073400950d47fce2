//! Resolve multimapping reads by re-aligning them with progressively longer seeds.

use anyhow::Result;
use clap::Parser;
use log::info;
use seedgrow_lib::aligner::TophatAligner;
use seedgrow_lib::resolve::{ResolveConfig, Resolver};
use seedgrow_lib::validation::validate_positive;
use std::path::PathBuf;

use crate::commands::command::Command;
use crate::commands::common::{
    FastqInputOptions, IoThreadsOptions, MultiplicityOptions, program_info,
};

/// Iteratively re-align multimapping reads with longer seeds.
#[derive(Debug, Parser)]
#[command(
    name = "resolve",
    about = "\x1b[38;5;72m[ALIGNMENT]\x1b[0m      \x1b[36mResolve multimappers by growing the seed length\x1b[0m",
    long_about = r#"
Resolve multimapping reads by re-aligning them with progressively longer seeds.

All reads are first truncated to --min-length bases and aligned with TopHat. Reads that
align uniquely are written to the iteration's unique.bam. Reads that multimap are
truncated one base longer and aligned again, up to and including --max-length. A read
that multimapped at one length and does not align at all at the next is "lost"; its
earlier alignments are written to that earlier iteration's lost_multi.bam.

By default every length up to --max-length is run, even after no multimapped reads
remain; the aligner is then given an empty reads.fq. Some aligner versions exit with an
error on empty input, which fails the run. Use --stop-when-resolved to end the run at the
first length that leaves no multimapped reads instead.

Each length L gets its own directory under --output:

  len<L>/reads.fq            the truncated batch given to the aligner
  len<L>/accepted_hits.bam   every alignment of the batch (plus other aligner output)
  len<L>/unique.bam          records of the uniquely aligned reads
  len<L>/lost_multi.bam      records of the reads lost at length L+1
  iterations.tsv             read counts per length

Example usage:
  seedgrow resolve -i reads.fq.gz -o resolved -x hg19 -G genes.gtf -m 36
  seedgrow resolve -i a.fq b.fq -o out -x hg19 -s 20 -m 30 -p 8 --stop-when-resolved
"#
)]
pub struct Resolve {
    /// Input FASTQ options
    #[command(flatten)]
    pub input: FastqInputOptions,

    /// Output directory
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Bowtie index prefix of the genome
    #[arg(short = 'x', long = "index")]
    pub index: PathBuf,

    /// Seed length of the first iteration
    #[arg(short = 's', long = "min-length", default_value = "18")]
    pub min_length: usize,

    /// Seed length of the last iteration
    #[arg(short = 'm', long = "max-length")]
    pub max_length: usize,

    /// Reference gene annotation (GTF) passed to the aligner
    #[arg(short = 'G', long = "gtf")]
    pub gtf: Option<PathBuf>,

    /// Transcriptome index prefix passed to the aligner
    #[arg(long = "transcriptome-index", default_value = "txome")]
    pub transcriptome_index: PathBuf,

    /// Threads for the aligner
    #[arg(short = 'p', long = "threads", default_value = "2")]
    pub threads: usize,

    /// Aligner program to run
    #[arg(long = "aligner", default_value = "tophat")]
    pub aligner: PathBuf,

    /// Extra argument for the aligner, inserted before the index (repeatable)
    #[arg(long = "aligner-arg", allow_hyphen_values = true)]
    pub aligner_args: Vec<String>,

    /// Multiplicity options
    #[command(flatten)]
    pub multiplicity: MultiplicityOptions,

    /// Stop after the first length that leaves no multimapped reads
    #[arg(long = "stop-when-resolved", default_value = "false")]
    pub stop_when_resolved: bool,

    /// Remove each truncated batch once its alignments have been classified
    #[arg(long = "discard-batches", default_value = "false")]
    pub discard_batches: bool,

    /// BAM threading options
    #[command(flatten)]
    pub io: IoThreadsOptions,
}

impl Resolve {
    fn aligner(&self) -> TophatAligner {
        TophatAligner {
            program: self.aligner.clone(),
            index: self.index.clone(),
            transcriptome_index: self.transcriptome_index.clone(),
            gtf: self.gtf.clone(),
            threads: self.threads,
            extra_args: self.aligner_args.clone(),
        }
    }

    fn config(&self, command_line: &str) -> ResolveConfig {
        ResolveConfig {
            inputs: self.input.inputs.clone(),
            output_dir: self.output.clone(),
            min_length: self.min_length,
            max_length: self.max_length,
            multiplicity: self.multiplicity.multiplicity,
            stop_when_resolved: self.stop_when_resolved,
            discard_batches: self.discard_batches,
            io_threads: self.io.io_threads,
            program: program_info(command_line),
        }
    }
}

impl Command for Resolve {
    fn execute(&self, command_line: &str) -> Result<()> {
        self.io.validate()?;
        validate_positive(self.threads, "threads")?;
        let config = self.config(command_line);
        config.validate()?;
        let resolver = Resolver::new(self.aligner(), config);

        let config = resolver.config();
        info!("Output: {}", config.output_dir.display());
        info!("Index: {}", resolver.aligner().index.display());
        info!("Seed lengths: {}..={}", config.min_length, config.max_length);
        info!("Multiplicity: {:?}", config.multiplicity);
        if let Some(gtf) = &resolver.aligner().gtf {
            info!("GTF: {}", gtf.display());
        }

        let metrics = resolver.run()?;
        info!("Completed {} iterations", metrics.len());
        Ok(())
    }
}
