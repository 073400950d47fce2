//! The iteration driver.
//!
//! Reads are aligned with a seed of `min_length` bases first. Every read that multimaps is
//! truncated one base longer and aligned again, until `max_length` has been tried:
//!
//! ```text
//! filter = Unfiltered
//! for length in min_length..=max_length:
//!     batch      = extract(inputs, filter, length)
//!     alignments = align(batch)
//!     classes    = classify(alignments)          -> unique.bam
//!     promote len<L>.partial -> len<L>
//!     if previous: previous.multimapped - classes.aligned -> previous/lost_multi.bam
//!     filter = Identifiers(classes.multimapped)
//! ```
//!
//! Every iteration works in a staging directory `<output>/len<L>.partial` that is renamed to
//! `<output>/len<L>` once its batch, alignments and unique reads are complete. The previous
//! iteration's classification is kept only until its lost multimappers have been written.

use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::aligner::Aligner;
use crate::classify::{Classification, MultiplicityMode, classify_alignments};
use crate::fastq::extract_subset;
use crate::header::ProgramInfo;
use crate::logging::{OperationTimer, format_count, log_iteration_summary};
use crate::lost::split_lost_multimappers;
use crate::metrics::{IterationMetric, write_metrics};
use crate::read_filter::ReadFilter;
use crate::staging::{prepare_staging_dir, promote_dir};
use crate::validation::{validate_file_exists, validate_min_max, validate_positive};

/// Name of the per-iteration metrics file in the output directory.
pub const METRICS_FILE: &str = "iterations.tsv";

/// File names used inside an iteration directory.
const BATCH_FILE: &str = "reads.fq";
const UNIQUE_FILE: &str = "unique.bam";
const LOST_FILE: &str = "lost_multi.bam";
const STAGING_SUFFIX: &str = ".partial";

/// The output locations of one iteration.
///
/// All per-iteration paths are derived here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationContext {
    trim_length: usize,
    dir: PathBuf,
    staging_dir: PathBuf,
}

impl IterationContext {
    /// The context for `trim_length` under the run's output directory.
    #[must_use]
    pub fn new(output_dir: &Path, trim_length: usize) -> Self {
        let name = format!("len{trim_length}");
        Self {
            trim_length,
            dir: output_dir.join(&name),
            staging_dir: output_dir.join(format!("{name}{STAGING_SUFFIX}")),
        }
    }

    /// Seed length of this iteration.
    #[must_use]
    pub fn trim_length(&self) -> usize {
        self.trim_length
    }

    /// Final directory of this iteration.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Directory the iteration works in until it is promoted.
    #[must_use]
    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// The truncated read batch.
    #[must_use]
    pub fn batch(&self) -> PathBuf {
        self.dir.join(BATCH_FILE)
    }

    /// Records of the uniquely aligned reads.
    #[must_use]
    pub fn unique(&self) -> PathBuf {
        self.dir.join(UNIQUE_FILE)
    }

    /// Records of reads that were lost at the next length.
    #[must_use]
    pub fn lost_multimappers(&self) -> PathBuf {
        self.dir.join(LOST_FILE)
    }

    fn staged(&self, name: &str) -> PathBuf {
        self.staging_dir.join(name)
    }

    /// Maps a path inside the staging directory to its location after promotion. Paths
    /// outside the staging directory are returned unchanged.
    #[must_use]
    pub fn promoted(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.staging_dir)
            .map_or_else(|_| path.to_path_buf(), |relative| self.dir.join(relative))
    }
}

/// What is kept of an iteration until the next one has run.
#[derive(Debug)]
pub struct IterationState {
    /// Output locations.
    pub context: IterationContext,
    /// Filter the batch was extracted with.
    pub filter: ReadFilter,
    /// The aligner's output, after promotion.
    pub alignments: PathBuf,
    /// Classification of the aligned reads.
    pub classification: Classification,
    /// Counts so far; lost multimappers are filled in by the next iteration.
    pub metric: IterationMetric,
}

/// Parameters of a resolve run.
#[derive(Debug, Clone)]
pub struct ResolveConfig {
    /// Source FASTQs, plain or gzipped.
    pub inputs: Vec<PathBuf>,
    /// Directory receiving `len<L>` directories and the metrics file.
    pub output_dir: PathBuf,
    /// First seed length.
    pub min_length: usize,
    /// Last seed length.
    pub max_length: usize,
    /// How a read's number of alignments is determined.
    pub multiplicity: MultiplicityMode,
    /// End the run after the first iteration with no multimapped reads.
    pub stop_when_resolved: bool,
    /// Delete each batch once its alignments have been classified.
    pub discard_batches: bool,
    /// BGZF worker threads for BAM reading and writing.
    pub io_threads: usize,
    /// Provenance recorded in output headers.
    pub program: ProgramInfo,
}

impl ResolveConfig {
    /// Checks lengths and inputs before any work starts.
    ///
    /// # Errors
    /// Returns an error if a length is zero, `max_length < min_length`, no input was given or
    /// an input does not exist.
    pub fn validate(&self) -> Result<()> {
        validate_positive(self.min_length, "min-length")?;
        validate_min_max(self.min_length, self.max_length, "min-length", "max-length")?;
        if self.inputs.is_empty() {
            anyhow::bail!("At least one input FASTQ is required");
        }
        for input in &self.inputs {
            validate_file_exists(input, "Input FASTQ")?;
        }
        Ok(())
    }
}

fn step_failed(trim_length: usize, step: &str) -> String {
    format!("Iteration at trim length {trim_length} failed while {step}")
}

/// Runs the iterations of a resolve run with an [`Aligner`].
pub struct Resolver<A: Aligner> {
    aligner: A,
    config: ResolveConfig,
}

impl<A: Aligner> Resolver<A> {
    /// Creates a resolver.
    pub fn new(aligner: A, config: ResolveConfig) -> Self {
        Self { aligner, config }
    }

    /// The run's parameters.
    pub fn config(&self) -> &ResolveConfig {
        &self.config
    }

    /// The aligner run for every iteration.
    pub fn aligner(&self) -> &A {
        &self.aligner
    }

    /// Runs every iteration and writes the metrics file.
    ///
    /// Returns one metric per iteration that ran, in order of trim length.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or any step of any iteration fails.
    /// Iterations after a failure are not run.
    pub fn run(&self) -> Result<Vec<IterationMetric>> {
        self.config.validate()?;
        let (min_length, max_length) = (self.config.min_length, self.config.max_length);
        fs::create_dir_all(&self.config.output_dir).with_context(|| {
            format!("Failed to create output directory: {}", self.config.output_dir.display())
        })?;

        let mut metrics = Vec::with_capacity(max_length - min_length + 1);
        let mut filter = ReadFilter::Unfiltered;
        let mut previous: Option<IterationState> = None;

        for length in min_length..=max_length {
            let state = self.run_iteration(length, filter)?;

            if let Some(mut prev) = previous.take() {
                self.detect_lost(&mut prev, &state)?;
                metrics.push(prev.metric);
            }

            filter = ReadFilter::Identifiers(state.classification.multimapped.clone());
            let resolved = state.classification.multimapped.is_empty();
            previous = Some(state);

            if resolved && self.config.stop_when_resolved {
                if length < max_length {
                    info!(
                        "No multimapped reads remain; skipping lengths {}..={max_length}",
                        length + 1
                    );
                }
                break;
            }
        }

        if let Some(last) = previous {
            metrics.push(last.metric);
        }

        write_metrics(self.config.output_dir.join(METRICS_FILE), &metrics)?;
        log_iteration_summary(&metrics);
        Ok(metrics)
    }

    /// Extracts, aligns, classifies and promotes one iteration.
    fn run_iteration(&self, length: usize, filter: ReadFilter) -> Result<IterationState> {
        let context = IterationContext::new(&self.config.output_dir, length);
        let timer = OperationTimer::new(&format!("Aligning reads at trim length {length}"));
        match filter.len() {
            None => info!("Extracting all reads at length {length}"),
            Some(n) => {
                info!("Extracting {} multimapped reads at length {length}", format_count(n as u64));
            }
        }

        let batch = context.staged(BATCH_FILE);
        let counts = prepare_staging_dir(context.staging_dir())
            .and_then(|()| extract_subset(&self.config.inputs, &filter, length, &batch))
            .with_context(|| step_failed(length, "extracting reads"))?;

        let alignments = self
            .aligner
            .align(&batch, context.staging_dir())
            .with_context(|| step_failed(length, "aligning"))?;

        let classification = classify_alignments(
            &alignments,
            context.staged(UNIQUE_FILE),
            self.config.multiplicity,
            self.config.io_threads,
            &self.config.program,
        )
        .with_context(|| step_failed(length, "classifying alignments"))?;

        if self.config.discard_batches {
            fs::remove_file(&batch)
                .with_context(|| format!("Failed to remove batch: {}", batch.display()))
                .with_context(|| step_failed(length, "promoting outputs"))?;
        }
        promote_dir(context.staging_dir(), context.dir())
            .with_context(|| step_failed(length, "promoting outputs"))?;

        let metric = IterationMetric {
            trim_length: length,
            input_reads: counts.records_written,
            aligned_reads: classification.aligned.len() as u64,
            unique_reads: classification.unique.len() as u64,
            multimapped_reads: classification.multimapped.len() as u64,
            lost_multimappers: 0,
        };
        timer.log_completion(metric.input_reads);

        let alignments = context.promoted(&alignments);
        Ok(IterationState { context, filter, alignments, classification, metric })
    }

    /// Writes the previous iteration's lost multimappers given the current iteration.
    fn detect_lost(&self, previous: &mut IterationState, current: &IterationState) -> Result<()> {
        let length = previous.context.trim_length();
        // The current batch holds exactly the reads that multimapped in the previous one.
        let eligible = match &current.filter {
            ReadFilter::Identifiers(names) => names,
            ReadFilter::Unfiltered => &previous.classification.multimapped,
        };
        let counts = split_lost_multimappers(
            &previous.alignments,
            eligible,
            &current.classification,
            previous.context.lost_multimappers(),
            self.config.io_threads,
            &self.config.program,
        )
        .with_context(|| step_failed(length, "detecting lost multimappers"))?;
        previous.metric.lost_multimappers = counts.reads;
        Ok(())
    }
}
