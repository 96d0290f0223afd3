//! Progress bar utilities for long-running operations
//!
//! Visual feedback while feeds are generated and files are compared or
//! analyzed, using the indicatif crate. Every widget can be created hidden so
//! scripted runs stay quiet.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar for feed generation, counted in iterations (Add events)
pub struct GenerationProgress {
    pub progress: ProgressBar,
    pub total_iterations: u64,
}

impl GenerationProgress {
    pub fn new(total_iterations: usize, visible: bool) -> Self {
        let total_iterations = total_iterations as u64;
        let progress = if visible {
            ProgressBar::new(total_iterations)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})\n{msg}")
        {
            progress.set_style(style.progress_chars("#>-"));
        }

        Self {
            progress,
            total_iterations,
        }
    }

    /// Advance by one iteration; the message is refreshed every 4096 iterations
    pub fn tick(&self, rows_written: u64) {
        self.progress.inc(1);
        let pos = self.progress.position();
        if pos % 4096 == 0 || pos == self.total_iterations {
            self.progress.set_message(format!("📝 {} rows written", rows_written));
        }
    }

    pub fn position(&self) -> u64 {
        self.progress.position()
    }

    pub fn finish(&self, rows: u64, path: &str) {
        self.progress.finish_with_message(format!(
            "✅ Wrote {} rows to {}",
            rows, path
        ));
    }

    pub fn finish_with_error(&self, error: &str) {
        self.progress.abandon_with_message(format!("❌ Failed: {}", error));
    }
}

/// Spinner for quick operations
pub struct Spinner {
    pub spinner: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str, visible: bool) -> Self {
        let spinner = if visible {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
        }
        if visible {
            spinner.enable_steady_tick(Duration::from_millis(100));
        }
        spinner.set_message(message.to_string());

        Self { spinner }
    }

    pub fn update(&self, message: &str) {
        self.spinner.set_message(message.to_string());
    }

    pub fn finish(&self, message: &str) {
        self.spinner.finish_with_message(format!("✅ {}", message));
    }

    pub fn finish_with_error(&self, message: &str) {
        self.spinner.finish_with_message(format!("❌ {}", message));
    }
}
