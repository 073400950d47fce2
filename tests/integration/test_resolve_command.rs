//! Integration tests for the resolve command.
//!
//! These runs use stand-in aligner programs; full runs use the scripted aligner instead.

use std::process::{Command, Output};
use tempfile::TempDir;

use crate::helpers::write_reads;

fn run_resolve(dir: &TempDir, extra: &[&str]) -> Output {
    let input = dir.path().join("reads.fq");
    let output = dir.path().join("out");
    write_reads(&input, &["r1", "r2"]);

    Command::new(env!("CARGO_BIN_EXE_seedgrow"))
        .args([
            "resolve",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-x",
            dir.path().join("genome").to_str().unwrap(),
        ])
        .args(extra)
        .output()
        .expect("Failed to run resolve command")
}

#[test]
fn test_max_below_min_fails_before_any_work() {
    let dir = TempDir::new().unwrap();
    let result = run_resolve(&dir, &["-s", "20", "-m", "19", "--aligner", "true"]);

    assert!(!result.status.success());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_aligner_failure_names_iteration() {
    let dir = TempDir::new().unwrap();
    let result = run_resolve(&dir, &["-s", "18", "-m", "20", "--aligner", "false"]);

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("trim length 18"), "stderr: {stderr}");
    assert!(stderr.contains("aligning"), "stderr: {stderr}");
    assert!(!dir.path().join("out/len18").exists());
    assert!(!dir.path().join("out/len19").exists());
}

#[test]
fn test_aligner_without_output_fails() {
    let dir = TempDir::new().unwrap();
    let result = run_resolve(&dir, &["-s", "18", "-m", "18", "--aligner", "true"]);

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("accepted_hits.bam"), "stderr: {stderr}");
    assert!(!dir.path().join("out/len18").exists());
    assert!(!dir.path().join("out/iterations.tsv").exists());
}
