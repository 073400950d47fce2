//! Running the external aligner on one batch of reads.
//!
//! The resolver only depends on the [`Aligner`] trait: given a FASTQ batch and a directory,
//! produce a BAM of alignments. [`TophatAligner`] implements it by running TopHat (or any
//! program with the same command line) as a child process and waiting for it to exit.

use anyhow::{Context, Result};
use log::{debug, info};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::errors::SeedgrowError;

/// Name of the alignment file TopHat writes into its output directory.
pub const ACCEPTED_HITS: &str = "accepted_hits.bam";

/// Aligns a batch of reads.
pub trait Aligner {
    /// Aligns the reads in `batch`, writing into `output_dir`, and returns the path of the
    /// BAM holding every alignment of the batch.
    ///
    /// # Errors
    /// Returns an error if alignment fails or produces no output.
    fn align(&self, batch: &Path, output_dir: &Path) -> Result<PathBuf>;
}

/// Runs TopHat against a Bowtie index and a transcriptome index.
#[derive(Debug, Clone)]
pub struct TophatAligner {
    /// Program to run.
    pub program: PathBuf,
    /// Bowtie index prefix of the genome.
    pub index: PathBuf,
    /// Transcriptome index prefix; built by TopHat on first use when a GTF is given.
    pub transcriptome_index: PathBuf,
    /// Gene annotation passed with `-G`.
    pub gtf: Option<PathBuf>,
    /// Threads for the aligner (`-p`).
    pub threads: usize,
    /// Extra arguments inserted before the index.
    pub extra_args: Vec<String>,
}

impl TophatAligner {
    /// Creates an aligner running `tophat` with two threads and a `txome` transcriptome index.
    #[must_use]
    pub fn new(index: impl Into<PathBuf>) -> Self {
        Self {
            program: PathBuf::from("tophat"),
            index: index.into(),
            transcriptome_index: PathBuf::from("txome"),
            gtf: None,
            threads: 2,
            extra_args: Vec::new(),
        }
    }

    /// The arguments passed to the program for one batch.
    #[must_use]
    pub fn arguments(&self, batch: &Path, output_dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-o".into(),
            output_dir.as_os_str().to_owned(),
            "-p".into(),
            self.threads.to_string().into(),
        ];
        if let Some(gtf) = &self.gtf {
            args.push("-G".into());
            args.push(gtf.as_os_str().to_owned());
        }
        args.push("--no-novel-juncs".into());
        let mut txome = OsString::from("--transcriptome-index=");
        txome.push(&self.transcriptome_index);
        args.push(txome);
        args.push("-T".into());
        args.extend(self.extra_args.iter().map(OsString::from));
        args.push(self.index.as_os_str().to_owned());
        args.push(batch.as_os_str().to_owned());
        args
    }
}

impl Aligner for TophatAligner {
    fn align(&self, batch: &Path, output_dir: &Path) -> Result<PathBuf> {
        let args = self.arguments(batch, output_dir);
        let rendered: Vec<String> =
            args.iter().map(|arg| arg.to_string_lossy().into_owned()).collect();
        info!("Running: {} {}", self.program.display(), rendered.join(" "));

        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .with_context(|| format!("Failed to start aligner: {}", self.program.display()))?;
        debug!("Aligner exited with {status}");

        if !status.success() {
            return Err(SeedgrowError::AlignerFailed {
                program: self.program.display().to_string(),
                status,
            }
            .into());
        }

        let alignments = output_dir.join(ACCEPTED_HITS);
        if !alignments.is_file() {
            return Err(SeedgrowError::MissingAlignmentOutput { path: alignments }.into());
        }
        Ok(alignments)
    }
}
