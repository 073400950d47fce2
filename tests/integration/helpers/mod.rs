//! Helper utilities for integration tests.

pub mod scripted_aligner;

pub use reads::*;
pub use scripted_aligner::*;
