// file: src/store/mod.rs
// description: artifact store abstraction and backend selection
// reference: internal module structure

pub mod http;
pub mod local;

use crate::config::{StoreBackend, StoreConfig};
use crate::error::Result;
use crate::models::{ArtifactRecord, ArtifactRef, NewArtifact, RunRecord};
use async_trait::async_trait;
use std::path::PathBuf;

pub use http::HttpArtifactStore;
pub use local::LocalArtifactStore;

/// A versioned artifact registry that also tracks the runs using it.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Registers a new run and returns its record.
    async fn start_run(&self, job_type: &str, config: serde_json::Value) -> Result<RunRecord>;

    /// Resolves `reference` to a local file, recording the use on `run`.
    async fn fetch(&self, run: &mut RunRecord, reference: &ArtifactRef) -> Result<PathBuf>;

    /// Registers `artifact` as the next version of its name, produced by `run`.
    async fn publish(&self, run: &mut RunRecord, artifact: NewArtifact) -> Result<ArtifactRecord>;

    /// Persists the final state of `run`.
    async fn finish_run(&self, run: &RunRecord) -> Result<()>;
}

pub fn open_store(config: &StoreConfig) -> Result<Box<dyn ArtifactStore>> {
    match config.backend {
        StoreBackend::Local => Ok(Box::new(LocalArtifactStore::new(config.root.clone()))),
        StoreBackend::Http => Ok(Box::new(HttpArtifactStore::from_config(config)?)),
    }
}
