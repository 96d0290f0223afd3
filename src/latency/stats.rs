// Per-stage latency statistics

use serde::{Deserialize, Serialize};

/// Quantiles reported for every stage
pub const QUANTILES: [f64; 4] = [0.50, 0.90, 0.99, 0.999];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSummary {
    pub stage: String,
    pub count: usize,
    pub min_us: f64,
    pub max_us: f64,
    pub mean_us: f64,
    pub p50_us: f64,
    pub p90_us: f64,
    pub p99_us: f64,
    pub p999_us: f64,
}

impl StageSummary {
    /// Summarize microsecond samples that are already sorted ascending.
    /// Returns `None` for an empty slice.
    pub fn from_sorted(stage: &str, sorted_us: &[f64]) -> Option<Self> {
        let first = *sorted_us.first()?;
        let last = *sorted_us.last()?;
        let mean = sorted_us.iter().sum::<f64>() / sorted_us.len() as f64;
        let [p50, p90, p99, p999] = QUANTILES.map(|q| quantile_sorted(sorted_us, q));

        Some(Self {
            stage: stage.to_string(),
            count: sorted_us.len(),
            min_us: first,
            max_us: last,
            mean_us: mean,
            p50_us: p50,
            p90_us: p90,
            p99_us: p99,
            p999_us: p999,
        })
    }
}

/// Quantile with linear interpolation between the two closest ranks.
///
/// `sorted` must be ascending and non-empty; `q` is clamped to `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = (n - 1) as f64 * q.clamp(0.0, 1.0);
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}
