// Common test utilities and helpers
#![allow(dead_code)]

use feedlab::{generate, Event, FeedWriter, GeneratorParams};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Parameters with cancels and executions switched off
pub fn adds_only_params() -> GeneratorParams {
    GeneratorParams {
        cancel_probability: 0.0,
        execute_probability: 0.0,
        ..GeneratorParams::default()
    }
}

/// Parameters that exercise every event kind often
pub fn busy_params() -> GeneratorParams {
    GeneratorParams {
        burst_probability: 0.2,
        cancel_probability: 0.4,
        execute_probability: 0.6,
        ..GeneratorParams::default()
    }
}

pub fn generate_feed(count: usize, seed: u64, params: GeneratorParams) -> Vec<Event> {
    generate(count, seed, params).expect("Failed to generate feed")
}

/// Render events exactly as the feed file would contain them
pub fn feed_bytes(events: &[Event]) -> Vec<u8> {
    let mut writer = FeedWriter::new(Vec::new()).expect("Failed to write header");
    writer.write_all(events.iter().copied()).expect("Failed to write rows");
    writer.into_inner().expect("Failed to flush feed")
}

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

pub fn write_temp_file(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("Failed to write temp file");
    path
}
