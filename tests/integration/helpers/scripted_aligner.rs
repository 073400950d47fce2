//! An in-process aligner with scripted results.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use seedgrow_lib::aligner::{ACCEPTED_HITS, Aligner};
use seedgrow_lib::testutil::{read_hits, write_test_bam};

/// One batch handed to the aligner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Length of the batch's reads (0 for an empty batch).
    pub length: usize,
    /// Read identifiers, in batch order.
    pub names: Vec<String>,
}

/// Reports a scripted number of hits for each read at each seed length.
///
/// Reads without a script entry for a length do not align.
#[derive(Debug, Default)]
pub struct ScriptedAligner {
    hits: HashMap<(String, usize), usize>,
    batches: RefCell<Vec<Batch>>,
}

impl ScriptedAligner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts `read` to have `hits` alignments at `length`.
    pub fn hits(mut self, read: &str, length: usize, hits: usize) -> Self {
        self.hits.insert((read.to_string(), length), hits);
        self
    }

    /// Batches seen so far.
    pub fn batches(&self) -> Vec<Batch> {
        self.batches.borrow().clone()
    }
}

impl Aligner for ScriptedAligner {
    fn align(&self, batch: &Path, output_dir: &Path) -> Result<PathBuf> {
        let contents = fs::read_to_string(batch)?;
        let lines: Vec<&str> = contents.lines().collect();

        let mut names = Vec::new();
        let mut length = 0;
        let mut records = Vec::new();
        for chunk in lines.chunks(4) {
            let name =
                chunk[0].trim_start_matches('@').split_whitespace().next().unwrap_or_default();
            length = chunk[1].len();
            let hits = self.hits.get(&(name.to_string(), length)).copied().unwrap_or(0);
            records.extend(read_hits(name, hits));
            names.push(name.to_string());
        }
        self.batches.borrow_mut().push(Batch { length, names });

        let path = output_dir.join(ACCEPTED_HITS);
        write_test_bam(&path, &records)?;
        Ok(path)
    }
}
