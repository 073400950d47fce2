//! End-to-end resolve runs over seed lengths 18..=20.

use seedgrow_lib::resolve::{METRICS_FILE, Resolver};
use seedgrow_lib::metrics::IterationMetric;
use fgoxide::io::DelimFile;
use tempfile::TempDir;

use crate::helpers::{
    ScriptedAligner, distinct_bam_names, fastq_names, iteration_dir, resolve_config, write_reads,
};

#[test]
fn test_multimapper_resolved_at_next_length() {
    let dir = TempDir::new().unwrap();
    write_reads(&dir.path().join("reads.fq"), &["R"]);
    let aligner = ScriptedAligner::new().hits("R", 18, 3).hits("R", 19, 1);

    let resolver = Resolver::new(aligner, resolve_config(dir.path(), 18, 20));
    let metrics = resolver.run().unwrap();

    let len18 = iteration_dir(dir.path(), 18);
    let len19 = iteration_dir(dir.path(), 19);
    let len20 = iteration_dir(dir.path(), 20);
    assert!(distinct_bam_names(&len18.join("unique.bam")).is_empty());
    assert_eq!(distinct_bam_names(&len19.join("unique.bam")), vec!["R"]);
    assert!(distinct_bam_names(&len18.join("lost_multi.bam")).is_empty());
    assert!(fastq_names(&len20.join("reads.fq")).is_empty());

    assert_eq!(metrics[0].multimapped_reads, 1);
    assert_eq!(metrics[1].unique_reads, 1);
    assert_eq!(metrics[2].input_reads, 0);
    assert!(metrics.iter().all(|m| m.lost_multimappers == 0));
}

#[test]
fn test_multimapper_lost_at_next_length() {
    let dir = TempDir::new().unwrap();
    write_reads(&dir.path().join("reads.fq"), &["R"]);
    let aligner = ScriptedAligner::new().hits("R", 18, 2);

    let resolver = Resolver::new(aligner, resolve_config(dir.path(), 18, 20));
    let metrics = resolver.run().unwrap();

    let len18 = iteration_dir(dir.path(), 18);
    let len19 = iteration_dir(dir.path(), 19);
    assert_eq!(distinct_bam_names(&len18.join("lost_multi.bam")), vec!["R"]);
    assert_eq!(seedgrow_lib::testutil::bam_names(len18.join("lost_multi.bam"), 1).unwrap().len(), 2);
    assert!(distinct_bam_names(&len19.join("unique.bam")).is_empty());
    assert!(distinct_bam_names(&len19.join("lost_multi.bam")).is_empty());

    assert_eq!(metrics[0].lost_multimappers, 1);
    assert_eq!(metrics[1].aligned_reads, 0);
    assert_eq!(metrics[1].multimapped_reads, 0);
}

#[test]
fn test_unique_read_not_carried_forward() {
    let dir = TempDir::new().unwrap();
    write_reads(&dir.path().join("reads.fq"), &["R", "M"]);
    let aligner = ScriptedAligner::new()
        .hits("R", 18, 1)
        .hits("M", 18, 2)
        .hits("M", 19, 2)
        .hits("M", 20, 2);

    let resolver = Resolver::new(aligner, resolve_config(dir.path(), 18, 20));
    resolver.run().unwrap();

    assert_eq!(distinct_bam_names(&iteration_dir(dir.path(), 18).join("unique.bam")), vec!["R"]);
    let batches = resolver.aligner().batches();
    assert_eq!(batches[0].names, vec!["R", "M"]);
    assert_eq!(batches[1].names, vec!["M"]);
    assert_eq!(batches[2].names, vec!["M"]);
    assert_eq!(fastq_names(&iteration_dir(dir.path(), 19).join("reads.fq")), vec!["M"]);
}

#[test]
fn test_batches_are_truncated_to_each_length() {
    let dir = TempDir::new().unwrap();
    write_reads(&dir.path().join("reads.fq"), &["M"]);
    let aligner =
        ScriptedAligner::new().hits("M", 18, 2).hits("M", 19, 2).hits("M", 20, 2);

    let resolver = Resolver::new(aligner, resolve_config(dir.path(), 18, 20));
    resolver.run().unwrap();

    let lengths: Vec<usize> = resolver.aligner().batches().iter().map(|b| b.length).collect();
    assert_eq!(lengths, vec![18, 19, 20]);
}

#[test]
fn test_metrics_file_matches_returned_metrics() {
    let dir = TempDir::new().unwrap();
    write_reads(&dir.path().join("reads.fq"), &["A", "B", "C"]);
    let aligner = ScriptedAligner::new()
        .hits("A", 18, 1)
        .hits("B", 18, 4)
        .hits("C", 18, 2)
        .hits("B", 19, 1);

    let metrics = Resolver::new(aligner, resolve_config(dir.path(), 18, 20)).run().unwrap();

    let written: Vec<IterationMetric> =
        DelimFile::default().read_tsv(&dir.path().join("out").join(METRICS_FILE)).unwrap();
    assert_eq!(written, metrics);
    assert_eq!(
        metrics[0],
        IterationMetric {
            trim_length: 18,
            input_reads: 3,
            aligned_reads: 3,
            unique_reads: 1,
            multimapped_reads: 2,
            lost_multimappers: 1,
        }
    );
}
