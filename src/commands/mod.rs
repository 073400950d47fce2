//! CLI command implementations for seedgrow.
//!
//! ## Alignment
//! - [`resolve`] - Iteratively re-align multimappers with longer seeds
//! - [`classify`] - Split an alignment file into unique and multimapped reads
//!
//! ## Utilities
//! - [`trim`] - Truncate FASTQ reads to a seed length

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::must_use_candidate
)]

pub mod classify;
pub mod command;
pub mod common;
pub mod resolve;
pub mod trim;
