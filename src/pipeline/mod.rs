// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod cleaner;
mod progress;

pub use cleaner::{Cleaner, CleaningReport};
pub use progress::{CleaningStats, StepTracker};
