// Byte-level comparison of two engine-run outputs

use crate::error::{FeedError, FeedResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use tracing::debug;

const CHUNK_SIZE: usize = 64 * 1024;

/// First byte at which the two inputs disagree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteDiff {
    pub offset: u64,
    pub left: u8,
    pub right: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub identical: bool,
    /// Only set when the common prefix differs
    pub first_diff: Option<ByteDiff>,
    /// `(left_len, right_len)` when the lengths differ
    pub length_mismatch: Option<(u64, u64)>,
}

impl Comparison {
    fn from_parts(first_diff: Option<ByteDiff>, left_len: u64, right_len: u64) -> Self {
        let length_mismatch = (left_len != right_len).then_some((left_len, right_len));
        Self {
            identical: first_diff.is_none() && length_mismatch.is_none(),
            first_diff,
            length_mismatch,
        }
    }

    /// Human-readable report, one finding per line
    pub fn report_lines(&self) -> Vec<String> {
        if self.identical {
            return vec!["IDENTICAL".to_string()];
        }
        let mut lines = Vec::new();
        if let Some(diff) = self.first_diff {
            lines.push(format!("DIFF at byte {}: {} != {}", diff.offset, diff.left, diff.right));
        }
        if let Some((left, right)) = self.length_mismatch {
            lines.push(format!("DIFF length: {} != {}", left, right));
        }
        lines
    }
}

/// Compare two in-memory buffers.
pub fn compare_bytes(left: &[u8], right: &[u8]) -> Comparison {
    let first_diff = left
        .iter()
        .zip(right.iter())
        .position(|(a, b)| a != b)
        .map(|i| ByteDiff {
            offset: i as u64,
            left: left[i],
            right: right[i],
        });
    Comparison::from_parts(first_diff, left.len() as u64, right.len() as u64)
}

/// Compare two streams chunk by chunk. Both are always read to the end so the
/// reported lengths are exact.
pub fn compare_readers<A: Read, B: Read>(mut left: A, mut right: B) -> io::Result<Comparison> {
    let mut buf_left = vec![0u8; CHUNK_SIZE];
    let mut buf_right = vec![0u8; CHUNK_SIZE];
    let (mut left_len, mut right_len) = (0u64, 0u64);
    let mut first_diff = None;

    loop {
        let n_left = fill(&mut left, &mut buf_left)?;
        let n_right = fill(&mut right, &mut buf_right)?;
        if n_left == 0 && n_right == 0 {
            break;
        }

        // Offsets stay aligned until one side runs out
        if first_diff.is_none() {
            let common = n_left.min(n_right);
            let chunk = compare_bytes(&buf_left[..common], &buf_right[..common]);
            first_diff = chunk.first_diff.map(|d| ByteDiff {
                offset: left_len + d.offset,
                ..d
            });
        }

        left_len += n_left as u64;
        right_len += n_right as u64;
    }

    Ok(Comparison::from_parts(first_diff, left_len, right_len))
}

/// Compare two files on disk.
pub fn compare_files<P: AsRef<Path>, Q: AsRef<Path>>(left: P, right: Q) -> FeedResult<Comparison> {
    let left = left.as_ref();
    let right = right.as_ref();
    debug!("Comparing {} with {}", left.display(), right.display());

    let file_left = open(left)?;
    let file_right = open(right)?;
    compare_readers(BufReader::new(file_left), BufReader::new(file_right))
        .map_err(|e| FeedError::FileRead(e.to_string()))
}

fn open(path: &Path) -> FeedResult<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => FeedError::FileNotFound(path.display().to_string()),
        _ => FeedError::FileRead(format!("{}: {}", path.display(), e)),
    })
}

/// Read until `buf` is full or the stream ends.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
