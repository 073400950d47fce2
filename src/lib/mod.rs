#![deny(unsafe_code)]
// cast_*: read and record counts move between usize and u64
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::needless_pass_by_value,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

//! # seedgrow - resolve multimapping reads by growing the alignment seed
//!
//! Short seeds map many reads to several places in the genome. This library re-aligns only
//! those ambiguous reads with a seed one base longer, again and again, until they align
//! uniquely, stop aligning, or the maximum length is reached.
//!
//! ## Overview
//!
//! ### Core Functionality
//!
//! - **[`fastq`]** - Extract the reads of an iteration and truncate them to the seed length
//! - **[`aligner`]** - The [`aligner::Aligner`] trait and the TopHat implementation
//! - **[`classify`]** - Split aligned reads into unique and multimapped
//! - **[`lost`]** - Find multimapped reads that no longer align at the next length
//! - **[`resolve`]** - The iteration driver tying the steps together
//!
//! ### Utilities
//!
//! - **[`bam_io`]** - BAM readers and atomic BAM writers
//! - **[`read_filter`]** - Read identifier sets and the batch filter
//! - **[`staging`]** - Files and directories that only appear when complete
//! - **[`header`]** - `@PG` provenance records
//! - **[`validation`]** - Input validation utilities for parameters and files
//! - **[`progress`]** - Progress tracking and logging
//! - **[`logging`]** - Formatting helpers and run summaries
//! - **[`metrics`]** - Per-iteration metrics and TSV output
//!
//! ## Quick Start
//!
//! ```no_run
//! use seedgrow_lib::aligner::TophatAligner;
//! use seedgrow_lib::classify::MultiplicityMode;
//! use seedgrow_lib::header::ProgramInfo;
//! use seedgrow_lib::resolve::{ResolveConfig, Resolver};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = ResolveConfig {
//!     inputs: vec!["reads.fq.gz".into()],
//!     output_dir: "resolved".into(),
//!     min_length: 18,
//!     max_length: 36,
//!     multiplicity: MultiplicityMode::Auto,
//!     stop_when_resolved: false,
//!     discard_batches: false,
//!     io_threads: 1,
//!     program: ProgramInfo::new("0.1.0", "seedgrow resolve"),
//! };
//! let metrics = Resolver::new(TophatAligner::new("genome"), config).run()?;
//! println!("{} iterations", metrics.len());
//! # Ok(())
//! # }
//! ```

pub mod aligner;
pub mod bam_io;
pub mod classify;
pub mod errors;
pub mod fastq;
pub mod header;
pub mod logging;
pub mod lost;
pub mod metrics;
pub mod progress;
pub mod read_filter;
pub mod resolve;
pub mod staging;
#[doc(hidden)]
pub mod testutil;
pub mod validation;
