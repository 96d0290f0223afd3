//! Latency analysis
//!
//! Reads a `stage,ns` sample table, then reports per-stage quantiles and an
//! equal-width histogram per stage. Stages keep their first-appearance order.

pub mod histogram;
pub mod stats;

pub use histogram::{Histogram, HISTOGRAM_HEADER};
pub use stats::{quantile_sorted, StageSummary, QUANTILES};

use crate::error::{FeedError, FeedResult};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencySample {
    pub stage: String,
    pub ns: u64,
}

/// Summary and histogram for one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageAnalysis {
    pub summary: StageSummary,
    pub histogram: Histogram,
}

/// JSON export of an analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyReport {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub stages: Vec<StageSummary>,
}

impl LatencyReport {
    pub fn new(source: &str, analyses: &[StageAnalysis]) -> Self {
        Self {
            version: crate::VERSION.to_string(),
            generated_at: Utc::now(),
            source: source.to_string(),
            stages: analyses.iter().map(|a| a.summary.clone()).collect(),
        }
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> FeedResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)
            .map_err(|e| FeedError::FileWrite(format!("{}: {}", path.as_ref().display(), e)))
    }
}

/// Parse a `stage,ns` table. The header is required and locates the columns,
/// so extra columns in any order are tolerated.
pub fn read_samples<R: BufRead>(source: R) -> FeedResult<Vec<LatencySample>> {
    let mut lines = source.lines().enumerate();

    let (stage_col, ns_col) = loop {
        let Some((_, line)) = lines.next() else {
            return Err(FeedError::EmptyInput("latency table".to_string()));
        };
        let line = line.map_err(|e| FeedError::FileRead(e.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }
        let columns: Vec<&str> = line.trim().split(',').map(str::trim).collect();
        let stage = columns.iter().position(|c| *c == "stage");
        let ns = columns.iter().position(|c| *c == "ns");
        match (stage, ns) {
            (Some(s), Some(n)) => break (s, n),
            _ => {
                return Err(FeedError::MalformedRow(1, format!("expected header with 'stage' and 'ns', got '{}'", line.trim())));
            }
        }
    };

    let mut samples = Vec::new();
    for (idx, line) in lines {
        let line = line.map_err(|e| FeedError::FileRead(e.to_string()))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let line_no = idx + 1;
        let (Some(stage), Some(ns)) = (fields.get(stage_col), fields.get(ns_col)) else {
            return Err(FeedError::MalformedRow(line_no, format!("expected {} columns", stage_col.max(ns_col) + 1)));
        };
        let ns = ns.parse::<u64>().map_err(|_| {
            FeedError::MalformedRow(line_no, format!("invalid ns value '{}'", ns))
        })?;
        samples.push(LatencySample { stage: stage.to_string(), ns });
    }
    Ok(samples)
}

pub fn read_samples_file<P: AsRef<Path>>(path: P) -> FeedResult<Vec<LatencySample>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => FeedError::FileNotFound(path.display().to_string()),
        _ => FeedError::FileRead(format!("{}: {}", path.display(), e)),
    })?;
    read_samples(BufReader::new(file))
}

/// Group samples by stage and analyze every stage in parallel.
pub fn analyze(samples: &[LatencySample], bins: usize) -> FeedResult<Vec<StageAnalysis>> {
    if samples.is_empty() {
        return Err(FeedError::EmptyInput("latency table".to_string()));
    }

    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<f64>> = HashMap::new();
    for sample in samples {
        let bucket = groups.entry(sample.stage.as_str()).or_insert_with(|| {
            order.push(sample.stage.as_str());
            Vec::new()
        });
        bucket.push(sample.ns as f64 / 1000.0);
    }

    let grouped: Vec<(&str, Vec<f64>)> = order
        .into_iter()
        .filter_map(|stage| groups.remove(stage).map(|v| (stage, v)))
        .collect();

    let analyses: Vec<StageAnalysis> = grouped
        .into_par_iter()
        .filter_map(|(stage, mut values)| {
            values.sort_by(|a, b| a.total_cmp(b));
            let summary = StageSummary::from_sorted(stage, &values)?;
            let histogram = Histogram::from_sorted(&values, bins);
            Some(StageAnalysis { summary, histogram })
        })
        .collect();

    debug!("Analyzed {} stage(s) from {} samples", analyses.len(), samples.len());
    Ok(analyses)
}

/// Path of the histogram artifact for `stage`
pub fn histogram_path(prefix: &str, stage: &str) -> PathBuf {
    let safe: String = stage
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    PathBuf::from(format!("{}_{}.csv", prefix, safe))
}

/// Write one histogram CSV per stage, returning the paths written.
pub fn write_histograms(prefix: &str, analyses: &[StageAnalysis]) -> FeedResult<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(analyses.len());
    for analysis in analyses {
        let path = histogram_path(prefix, &analysis.summary.stage);
        let file = File::create(&path)
            .map_err(|e| FeedError::FileWrite(format!("{}: {}", path.display(), e)))?;
        analysis
            .histogram
            .write_csv(BufWriter::new(file))
            .map_err(|e| FeedError::FileWrite(format!("{}: {}", path.display(), e)))?;
        info!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Fixed-width summary table: `stage p50_us p90_us p99_us p999_us`
pub fn format_summary_table(summaries: &[StageSummary]) -> String {
    let stage_width = summaries
        .iter()
        .map(|s| s.stage.len())
        .chain(std::iter::once("stage".len()))
        .max()
        .unwrap_or(5);

    let mut out = format!(
        "{:>sw$} {:>10} {:>10} {:>10} {:>10}\n",
        "stage", "p50_us", "p90_us", "p99_us", "p999_us",
        sw = stage_width
    );
    for s in summaries {
        out.push_str(&format!(
            "{:>sw$} {:>10.3} {:>10.3} {:>10.3} {:>10.3}\n",
            s.stage, s.p50_us, s.p90_us, s.p99_us, s.p999_us,
            sw = stage_width
        ));
    }
    out
}
