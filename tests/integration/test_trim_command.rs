//! Integration tests for the trim command.

use flate2::read::GzDecoder;
use std::fs;
use std::io::Read;
use std::process::Command;
use tempfile::TempDir;

use crate::helpers::{READ_LENGTH, fastq_names, write_reads};

#[test]
fn test_trim_all_reads() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.fq");
    let output = dir.path().join("seeds.fq");
    write_reads(&input, &["r1", "r2", "r3"]);

    let status = Command::new(env!("CARGO_BIN_EXE_seedgrow"))
        .args(["trim", "-i", input.to_str().unwrap(), "-o", output.to_str().unwrap(), "-l", "18"])
        .status()
        .expect("Failed to run trim command");

    assert!(status.success(), "Trim command failed");
    let contents = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 12);
    assert_eq!(lines[0], "@r1 sample");
    assert_eq!(lines[1], "A".repeat(18));
    assert_eq!(lines[3], "I".repeat(18));
    assert_eq!(fastq_names(&output), vec!["r1", "r2", "r3"]);
}

#[test]
fn test_trim_named_reads_to_gzip() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.fq");
    let names = dir.path().join("names.txt");
    let output = dir.path().join("multi.fq.gz");
    write_reads(&input, &["r1", "r2", "r3", "r4"]);
    fs::write(&names, "r4\nr2\n").unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_seedgrow"))
        .args([
            "trim",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-l",
            "20",
            "-n",
            names.to_str().unwrap(),
        ])
        .status()
        .expect("Failed to run trim command");

    assert!(status.success(), "Trim command failed");
    let mut contents = String::new();
    GzDecoder::new(fs::File::open(&output).unwrap()).read_to_string(&mut contents).unwrap();
    let quals = "I".repeat(20);
    let expected = format!(
        "@r2 sample\n{}\n+\n{quals}\n@r4 sample\n{}\n+\n{quals}\n",
        "C".repeat(20),
        "T".repeat(20)
    );
    assert_eq!(contents, expected);
}

#[test]
fn test_trim_longer_than_reads_is_unchanged() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.fq");
    let output = dir.path().join("seeds.fq");
    write_reads(&input, &["r1", "r2"]);

    let length = (READ_LENGTH + 5).to_string();
    let status = Command::new(env!("CARGO_BIN_EXE_seedgrow"))
        .args(["trim", "-i", input.to_str().unwrap(), "-o", output.to_str().unwrap(), "-l", &length])
        .status()
        .expect("Failed to run trim command");

    assert!(status.success(), "Trim command failed");
    assert_eq!(fs::read_to_string(&output).unwrap(), fs::read_to_string(&input).unwrap());
}

#[test]
fn test_trim_malformed_input_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.fq");
    let output = dir.path().join("seeds.fq");
    fs::write(&input, "@r1\nACGT\n+\nIIII\n@r2\nACGT\n+\n").unwrap();

    let result = Command::new(env!("CARGO_BIN_EXE_seedgrow"))
        .args(["trim", "-i", input.to_str().unwrap(), "-o", output.to_str().unwrap(), "-l", "2"])
        .output()
        .expect("Failed to run trim command");

    assert!(!result.status.success());
    assert!(!output.exists());
}
