// Equal-width latency histogram

use serde::{Deserialize, Serialize};
use std::io::{self, Write};

pub const HISTOGRAM_HEADER: &str = "bin_lower_us,bin_upper_us,count";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub lower_us: f64,
    pub width_us: f64,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Bin sorted samples into `bins` equal-width buckets spanning `[min, max]`.
    /// The last bucket is closed on the right. When every sample is equal the
    /// span is widened to one microsecond centred on the value.
    pub fn from_sorted(sorted_us: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let (lo, hi) = match (sorted_us.first(), sorted_us.last()) {
            (Some(&lo), Some(&hi)) if hi > lo => (lo, hi),
            (Some(&v), _) => (v - 0.5, v + 0.5),
            _ => (0.0, 1.0),
        };
        let width = (hi - lo) / bins as f64;

        let mut counts = vec![0u64; bins];
        for &v in sorted_us {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Self { lower_us: lo, width_us: width, counts }
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(lower, upper, count)` for every bucket
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, u64)> + '_ {
        self.counts.iter().enumerate().map(move |(i, &count)| {
            let lower = self.lower_us + self.width_us * i as f64;
            (lower, lower + self.width_us, count)
        })
    }

    pub fn write_csv<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "{}", HISTOGRAM_HEADER)?;
        for (lower, upper, count) in self.bins() {
            writeln!(out, "{:.3},{:.3},{}", lower, upper, count)?;
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_sum_to_samples() {
        let v: Vec<f64> = (0..1_000).map(|i| i as f64 * 0.37).collect();
        let h = Histogram::from_sorted(&v, 100);
        assert_eq!(h.counts.len(), 100);
        assert_eq!(h.total(), 1_000);
    }

    #[test]
    fn test_max_lands_in_last_bin() {
        let h = Histogram::from_sorted(&[0.0, 5.0, 10.0], 10);
        assert_eq!(h.counts[0], 1);
        assert_eq!(h.counts[5], 1);
        assert_eq!(h.counts[9], 1);
    }

    #[test]
    fn test_constant_samples() {
        let h = Histogram::from_sorted(&[3.0, 3.0, 3.0], 4);
        assert_eq!(h.total(), 3);
        assert_eq!(h.lower_us, 2.5);
    }

    #[test]
    fn test_csv_output() {
        let h = Histogram::from_sorted(&[0.0, 2.0], 2);
        let mut buf = Vec::new();
        h.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "bin_lower_us,bin_upper_us,count\n0.000,1.000,1\n1.000,2.000,1\n");
    }
}
