//! Invariants that hold for every iteration of a resolve run.

use seedgrow_lib::classify::{MultiplicityMode, tally_alignments};
use seedgrow_lib::read_filter::ReadNameSet;
use seedgrow_lib::resolve::{ResolveConfig, Resolver};
use std::collections::BTreeSet;
use tempfile::TempDir;

use crate::helpers::{
    ScriptedAligner, distinct_bam_names, fastq_names, iteration_dir, resolve_config, write_reads,
};

const MIN_LENGTH: usize = 18;
const MAX_LENGTH: usize = 22;

/// Twenty reads with hits that vary by read and length, including reads that stop aligning.
fn scripted_aligner() -> ScriptedAligner {
    let mut aligner = ScriptedAligner::new();
    for i in 0..20usize {
        let name = format!("read{i}");
        for length in MIN_LENGTH..=MAX_LENGTH {
            let step = length - MIN_LENGTH;
            let hits = match i % 5 {
                0 => 1,
                1 => if step < 2 { 3 } else { 1 },
                2 => if step < 1 { 2 } else { 0 },
                3 => 4 - step.min(3),
                _ => 2,
            };
            aligner = aligner.hits(&name, length, hits);
        }
    }
    aligner
}

fn run(dir: &TempDir) -> Resolver<ScriptedAligner> {
    let names: Vec<String> = (0..20).map(|i| format!("read{i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    write_reads(&dir.path().join("reads.fq"), &refs);

    let resolver = Resolver::new(scripted_aligner(), resolve_config(dir.path(), MIN_LENGTH, MAX_LENGTH));
    resolver.run().unwrap();
    resolver
}

fn to_set(names: &ReadNameSet) -> BTreeSet<String> {
    names.iter().map(|n| String::from_utf8_lossy(n).into_owned()).collect()
}

#[test]
fn test_unique_and_multimapped_partition_aligned() {
    let dir = TempDir::new().unwrap();
    run(&dir);

    for length in MIN_LENGTH..=MAX_LENGTH {
        let alignments = iteration_dir(dir.path(), length).join("accepted_hits.bam");
        let classes = tally_alignments(&alignments, MultiplicityMode::Auto, 1).unwrap();
        assert!(classes.unique.is_disjoint(&classes.multimapped), "length {length}");
        let union: ReadNameSet = classes.unique.union(&classes.multimapped).cloned().collect();
        assert_eq!(union, classes.aligned, "length {length}");

        let unique_bam: BTreeSet<String> =
            distinct_bam_names(&iteration_dir(dir.path(), length).join("unique.bam"))
                .into_iter()
                .collect();
        assert_eq!(unique_bam, to_set(&classes.unique), "length {length}");
    }
}

#[test]
fn test_next_batch_is_previous_multimapped_set() {
    let dir = TempDir::new().unwrap();
    run(&dir);

    for length in MIN_LENGTH..MAX_LENGTH {
        let alignments = iteration_dir(dir.path(), length).join("accepted_hits.bam");
        let classes = tally_alignments(&alignments, MultiplicityMode::Auto, 1).unwrap();
        let next_batch: BTreeSet<String> =
            fastq_names(&iteration_dir(dir.path(), length + 1).join("reads.fq"))
                .into_iter()
                .collect();
        assert_eq!(next_batch, to_set(&classes.multimapped), "length {length}");
    }
}

#[test]
fn test_lost_reads_were_multimapped_and_absent_next() {
    let dir = TempDir::new().unwrap();
    run(&dir);

    let mut total_lost = 0;
    for length in MIN_LENGTH..MAX_LENGTH {
        let current = iteration_dir(dir.path(), length);
        let next = iteration_dir(dir.path(), length + 1);
        let classes =
            tally_alignments(current.join("accepted_hits.bam"), MultiplicityMode::Auto, 1).unwrap();
        let next_classes =
            tally_alignments(next.join("accepted_hits.bam"), MultiplicityMode::Auto, 1).unwrap();

        let lost: BTreeSet<String> =
            distinct_bam_names(&current.join("lost_multi.bam")).into_iter().collect();
        let expected: BTreeSet<String> = to_set(&classes.multimapped)
            .difference(&to_set(&next_classes.aligned))
            .cloned()
            .collect();
        assert_eq!(lost, expected, "length {length}");
        for name in &lost {
            assert!(!to_set(&next_classes.unique).contains(name));
            assert!(!to_set(&next_classes.multimapped).contains(name));
        }
        total_lost += lost.len();
    }
    assert!(total_lost > 0);
    assert!(!iteration_dir(dir.path(), MAX_LENGTH).join("lost_multi.bam").exists());
}

#[test]
fn test_trim_length_advances_by_one() {
    let dir = TempDir::new().unwrap();
    let resolver = run(&dir);

    let lengths: Vec<usize> =
        resolver.aligner().batches().iter().filter(|b| !b.names.is_empty()).map(|b| b.length).collect();
    assert_eq!(lengths, (MIN_LENGTH..=MAX_LENGTH).collect::<Vec<_>>());
    assert!(!dir.path().join("out").join(format!("len{}", MAX_LENGTH + 1)).exists());
}

#[test]
fn test_count_and_tag_modes_agree_when_nh_matches() {
    let dir = TempDir::new().unwrap();
    run(&dir);

    for length in MIN_LENGTH..=MAX_LENGTH {
        let alignments = iteration_dir(dir.path(), length).join("accepted_hits.bam");
        let by_tag = tally_alignments(&alignments, MultiplicityMode::Tag, 1).unwrap();
        let by_count = tally_alignments(&alignments, MultiplicityMode::Count, 1).unwrap();
        assert_eq!(by_tag.unique, by_count.unique);
        assert_eq!(by_tag.multimapped, by_count.multimapped);
    }
}

#[test]
fn test_stop_when_resolved_ends_early() {
    let dir = TempDir::new().unwrap();
    write_reads(&dir.path().join("reads.fq"), &["A", "B"]);
    let aligner = ScriptedAligner::new().hits("A", 18, 1).hits("B", 18, 2).hits("B", 19, 1);
    let config = ResolveConfig { stop_when_resolved: true, ..resolve_config(dir.path(), 18, 24) };

    let resolver = Resolver::new(aligner, config);
    let metrics = resolver.run().unwrap();

    assert_eq!(metrics.len(), 2);
    assert_eq!(resolver.aligner().batches().len(), 2);
    assert!(!iteration_dir(dir.path(), 20).exists());
}
