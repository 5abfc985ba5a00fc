// file: src/pipeline/progress.rs
// description: step progress and row statistics for a cleaning run
// reference: uses indicatif for the step bar and tracks row counts per filter

use crate::utils::logging::format_step;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleaningStats {
    pub rows_read: usize,
    pub rows_after_price_filter: usize,
    pub rows_after_geo_filter: usize,
    pub unparsed_dates: usize,
    pub null_dates: usize,
    pub bytes_written: u64,
    pub duration: Duration,
}

impl CleaningStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn price_outliers(&self) -> usize {
        self.rows_read.saturating_sub(self.rows_after_price_filter)
    }

    pub fn outside_bounding_box(&self) -> usize {
        self.rows_after_price_filter
            .saturating_sub(self.rows_after_geo_filter)
    }

    pub fn retention_rate(&self) -> f64 {
        if self.rows_read == 0 {
            return 0.0;
        }
        (self.rows_after_geo_filter as f64 / self.rows_read as f64) * 100.0
    }
}

/// Progress over the fixed sequence of cleaning steps
pub struct StepTracker {
    bar: ProgressBar,
    total: usize,
    current: usize,
}

impl StepTracker {
    pub fn new(total: usize, visible: bool) -> Self {
        let bar = if visible {
            create_step_bar(total as u64)
        } else {
            ProgressBar::hidden()
        };

        Self {
            bar,
            total,
            current: 0,
        }
    }

    /// Marks the start of the next step and returns its label.
    pub fn begin(&mut self, message: &str) -> String {
        if self.current > 0 {
            self.bar.inc(1);
        }
        self.current = (self.current + 1).min(self.total);
        let label = format_step(self.current, self.total, message);
        self.bar.set_message(message.to_string());
        label
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn finish(&self) {
        self.bar.set_position(self.total as u64);
        self.bar.finish_and_clear();
    }

    pub fn abandon(&self) {
        self.bar.abandon_with_message("Cleaning aborted");
    }
}

fn create_step_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░"),
    );
    bar
}
