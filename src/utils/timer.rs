// file: src/utils/timer.rs
// description: step timing for the cleaning pipeline

use std::time::{Duration, Instant};
use tracing::debug;

/// Times one pipeline step and reports row throughput on completion
pub struct StepTimer {
    step: String,
    start: Instant,
}

impl StepTimer {
    pub fn new(step: &str) -> Self {
        debug!("Starting step: {}", step);
        Self {
            step: step.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish_with_rows(self, rows: usize) -> Duration {
        let elapsed = self.elapsed();
        debug!(
            "Completed step: {} - {} rows in {:.3}s ({:.0} rows/sec)",
            self.step,
            rows,
            elapsed.as_secs_f64(),
            rows_per_second(rows, elapsed)
        );
        elapsed
    }
}

pub fn rows_per_second(rows: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 { rows as f64 / secs } else { 0.0 }
}
