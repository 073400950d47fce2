//! `@PG` provenance records for the BAMs seedgrow writes.
//!
//! Output BAMs keep the header of the alignments they were derived from. A `@PG` record is
//! appended whose `PP` points at the last program already in the chain, so the aligner's
//! own `@PG` stays reachable.

use anyhow::Result;
use bstr::BString;
use noodles::sam::Header;
use noodles::sam::header::record::value::Map;
use noodles::sam::header::record::value::map::Program;
use noodles::sam::header::record::value::map::program::tag;
use std::collections::HashSet;

/// Program ID and name used in `@PG` records.
pub const PROGRAM_ID: &str = "seedgrow";

/// Version and command line recorded in the `@PG` records of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramInfo {
    /// Version string of the running binary.
    pub version: String,
    /// Command line the binary was invoked with.
    pub command_line: String,
}

impl ProgramInfo {
    /// Creates program info from a version and a command line.
    #[must_use]
    pub fn new(version: impl Into<String>, command_line: impl Into<String>) -> Self {
        Self { version: version.into(), command_line: command_line.into() }
    }

    /// Returns `header` with this program's `@PG` record appended.
    ///
    /// # Errors
    /// Returns an error if the record cannot be added.
    pub fn stamp(&self, header: Header) -> Result<Header> {
        add_pg_record(header, &self.version, &self.command_line)
    }
}

/// Returns the ID of the program at the end of the `@PG` chain.
///
/// That is the program no other program names as its `PP`. Returns `None` for a header
/// without programs.
#[must_use]
pub fn last_program_id(header: &Header) -> Option<String> {
    let programs = header.programs();
    let program_map = programs.as_ref();

    let referenced: HashSet<&[u8]> = program_map
        .values()
        .filter_map(|pg| pg.other_fields().get(&tag::PREVIOUS_PROGRAM_ID))
        .map(AsRef::as_ref)
        .collect();

    program_map
        .keys()
        .find(|id| !referenced.contains(id.as_slice()))
        .or_else(|| program_map.keys().next())
        .map(|id| String::from_utf8_lossy(id).into_owned())
}

/// Returns `base_id` if unused in `header`, else the first free `base_id.N`.
#[must_use]
pub fn unique_program_id(header: &Header, base_id: &str) -> String {
    let programs = header.programs();
    let program_map = programs.as_ref();

    if !program_map.contains_key(base_id.as_bytes()) {
        return base_id.to_string();
    }

    (1..)
        .map(|i: u32| format!("{base_id}.{i}"))
        .find(|candidate| !program_map.contains_key(candidate.as_bytes()))
        .unwrap_or_else(|| format!("{base_id}.{}", std::process::id()))
}

/// Builds a `@PG` record for this tool.
///
/// Empty `version` or `command_line` values are left out of the record.
///
/// # Errors
/// Returns an error if the record cannot be built.
pub fn program_record(
    version: &str,
    command_line: &str,
    previous_program: Option<&str>,
) -> Result<Map<Program>> {
    let mut builder = Map::<Program>::builder().insert(tag::NAME, PROGRAM_ID);
    if !version.is_empty() {
        builder = builder.insert(tag::VERSION, version);
    }
    if !command_line.is_empty() {
        builder = builder.insert(tag::COMMAND_LINE, command_line);
    }
    if let Some(pp) = previous_program {
        builder = builder.insert(tag::PREVIOUS_PROGRAM_ID, pp);
    }

    Ok(builder.build()?)
}

/// Appends a `@PG` record for this tool to `header`, chained to the last program.
///
/// # Errors
/// Returns an error if the record cannot be added.
pub fn add_pg_record(mut header: Header, version: &str, command_line: &str) -> Result<Header> {
    let previous_program = last_program_id(&header);
    let id = unique_program_id(&header, PROGRAM_ID);
    let record = program_record(version, command_line, previous_program.as_deref())?;

    header.programs_mut().add(BString::from(id), record)?;
    Ok(header)
}
