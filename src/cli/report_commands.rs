// Report command implementations: run diffing and latency analysis
use feedlab::latency::{format_summary_table, write_histograms};
use feedlab::{analyze, compare_files, read_samples_file, FeedResult, LatencyReport, Spinner};
use std::path::Path;
use tracing::info;

/// Prints the comparison findings on stdout. Returns the process exit code:
/// 0 when identical, 1 otherwise.
pub fn diff_runs(a: &Path, b: &Path, show_progress: bool) -> FeedResult<i32> {
    let spinner = Spinner::new(&format!("Comparing {} and {}...", a.display(), b.display()), show_progress);
    let comparison = match compare_files(a, b) {
        Ok(comparison) => comparison,
        Err(e) => {
            spinner.finish_with_error(&e.to_string());
            return Err(e);
        }
    };
    spinner.finish("Compared");

    for line in comparison.report_lines() {
        println!("{}", line);
    }
    Ok(if comparison.identical { 0 } else { 1 })
}

pub fn analyze_latency(
    lat: &Path,
    out_prefix: &str,
    bins: usize,
    json: Option<&Path>,
    show_progress: bool,
) -> FeedResult<()> {
    let spinner = Spinner::new(&format!("Loading {}...", lat.display()), show_progress);
    let samples = match read_samples_file(lat) {
        Ok(samples) => samples,
        Err(e) => {
            spinner.finish_with_error(&e.to_string());
            return Err(e);
        }
    };
    spinner.update(&format!("Analyzing {} samples...", samples.len()));
    let analyses = analyze(&samples, bins)?;
    spinner.finish(&format!("Analyzed {} stage(s)", analyses.len()));

    write_histograms(out_prefix, &analyses)?;

    let summaries: Vec<_> = analyses.iter().map(|a| a.summary.clone()).collect();
    print!("{}", format_summary_table(&summaries));

    if let Some(path) = json {
        LatencyReport::new(&lat.display().to_string(), &analyses).write_json(path)?;
        info!("📄 wrote {}", path.display());
    }
    Ok(())
}
