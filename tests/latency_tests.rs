// Integration tests for latency analysis

mod common;

use common::{create_temp_dir, write_temp_file};
use feedlab::latency::{histogram_path, write_histograms, HISTOGRAM_HEADER};
use feedlab::{analyze, read_samples_file, FeedError, LatencyReport};
use std::fmt::Write as _;
use std::fs;

fn latency_table() -> String {
    let mut table = String::from("stage,ns\n");
    for i in 1..=1_000u64 {
        writeln!(table, "parse,{}", i * 100).unwrap();
        writeln!(table, "e2e,{}", i * 1_000).unwrap();
    }
    table
}

#[test]
fn test_quantiles_per_stage() {
    let dir = create_temp_dir();
    let path = write_temp_file(&dir, "latency.csv", latency_table().as_bytes());

    let samples = read_samples_file(&path).expect("Failed to read samples");
    assert_eq!(samples.len(), 2_000);

    let analyses = analyze(&samples, 100).expect("Analysis failed");
    assert_eq!(analyses.len(), 2);

    let parse = &analyses[0].summary;
    assert_eq!(parse.stage, "parse");
    assert_eq!(parse.count, 1_000);
    // 0.1us .. 100us in 0.1us steps; median sits between ranks 500 and 501
    assert!((parse.p50_us - 50.05).abs() < 1e-6);
    assert!((parse.p99_us - 99.001).abs() < 1e-6);

    let e2e = &analyses[1].summary;
    assert!((e2e.p90_us - 900.1).abs() < 1e-6);
    assert!(e2e.p999_us <= e2e.max_us);
    assert!(e2e.p50_us <= e2e.p90_us && e2e.p90_us <= e2e.p99_us && e2e.p99_us <= e2e.p999_us);
}

#[test]
fn test_histogram_artifacts() {
    let dir = create_temp_dir();
    let path = write_temp_file(&dir, "latency.csv", latency_table().as_bytes());
    let analyses = analyze(&read_samples_file(&path).unwrap(), 20).unwrap();

    let prefix = dir.path().join("hist").display().to_string();
    let written = write_histograms(&prefix, &analyses).expect("Failed to write histograms");
    assert_eq!(written, vec![histogram_path(&prefix, "parse"), histogram_path(&prefix, "e2e")]);

    let text = fs::read_to_string(&written[0]).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(HISTOGRAM_HEADER));
    let total: u64 = lines
        .map(|l| l.rsplit(',').next().unwrap().parse::<u64>().unwrap())
        .sum();
    assert_eq!(total, 1_000);
}

#[test]
fn test_json_report() {
    let dir = create_temp_dir();
    let path = write_temp_file(&dir, "latency.csv", latency_table().as_bytes());
    let analyses = analyze(&read_samples_file(&path).unwrap(), 10).unwrap();

    let json_path = dir.path().join("report.json");
    LatencyReport::new("latency.csv", &analyses)
        .write_json(&json_path)
        .expect("Failed to write report");

    let parsed: LatencyReport = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(parsed.version, feedlab::VERSION);
    assert_eq!(parsed.stages.len(), 2);
    assert_eq!(parsed.stages[1].stage, "e2e");
}

#[test]
fn test_header_only_table_is_empty_input() {
    let dir = create_temp_dir();
    let path = write_temp_file(&dir, "latency.csv", b"stage,ns\n");
    let samples = read_samples_file(&path).unwrap();
    assert!(matches!(analyze(&samples, 10), Err(FeedError::EmptyInput(_))));
}
