// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod artifact;
pub mod params;
pub mod run;

pub use artifact::{ArtifactRecord, ArtifactRef, ArtifactVersion, NewArtifact, compute_digest};
pub use params::CleaningParams;
pub use run::{RunRecord, RunStatus};
