//! Integration tests for the classify command.

use seedgrow_lib::testutil::{bam_names, read_hits, unmapped_record, write_test_bam};
use std::fs;
use std::process::Command;
use tempfile::TempDir;

#[test]
fn test_classify_command() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("accepted_hits.bam");
    let unique = dir.path().join("unique.bam");
    let names = dir.path().join("multi.txt");

    let mut records = read_hits("u1", 1);
    records.extend(read_hits("m1", 2));
    records.extend(read_hits("u2", 1));
    records.extend(read_hits("m2", 5));
    records.push(unmapped_record("x1"));
    write_test_bam(&input, &records).unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_seedgrow"))
        .args([
            "classify",
            "-i",
            input.to_str().unwrap(),
            "-u",
            unique.to_str().unwrap(),
            "--multimapped-names",
            names.to_str().unwrap(),
        ])
        .status()
        .expect("Failed to run classify command");

    assert!(status.success(), "Classify command failed");
    assert_eq!(bam_names(&unique, 1).unwrap(), vec!["u1", "u2"]);
    assert_eq!(fs::read_to_string(&names).unwrap(), "m1\nm2\n");
}

#[test]
fn test_classify_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let unique = dir.path().join("unique.bam");

    let result = Command::new(env!("CARGO_BIN_EXE_seedgrow"))
        .args([
            "classify",
            "-i",
            dir.path().join("missing.bam").to_str().unwrap(),
            "-u",
            unique.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to run classify command");

    assert!(!result.status.success());
    assert!(!unique.exists());
}
