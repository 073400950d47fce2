//! Command trait definition for CLI commands.
//!
//! Subcommands are dispatched through `enum_dispatch` on the [`Command`] trait.

use anyhow::Result;
use enum_dispatch::enum_dispatch;

/// Trait implemented by all seedgrow CLI commands.
///
/// `command_line` is the full invocation, recorded in the `@PG` records of output BAMs.
#[enum_dispatch]
pub trait Command {
    #[allow(clippy::missing_errors_doc)]
    fn execute(&self, command_line: &str) -> Result<()>;
}
