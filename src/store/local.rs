// file: src/store/local.rs
// description: directory-backed artifact registry with versioned manifests
// reference: json metadata persistence on the local filesystem

use crate::error::{CleaningError, Result};
use crate::models::{
    ArtifactRecord, ArtifactRef, ArtifactVersion, NewArtifact, RunRecord, compute_digest,
};
use crate::store::ArtifactStore;
use crate::utils::Validator;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Versions of one artifact name, oldest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub name: String,
    pub versions: Vec<ArtifactRecord>,
}

impl ArtifactManifest {
    pub fn latest(&self) -> Option<&ArtifactRecord> {
        self.versions.iter().max_by_key(|r| r.version)
    }

    pub fn get(&self, version: ArtifactVersion) -> Option<&ArtifactRecord> {
        match version {
            ArtifactVersion::Latest => self.latest(),
            ArtifactVersion::Number(n) => self.versions.iter().find(|r| r.version == n),
        }
    }

    pub fn next_version(&self) -> u32 {
        self.latest().map(|r| r.version + 1).unwrap_or(0)
    }
}

/// Layout under `root`:
///
/// ```text
/// artifacts/<name>/manifest.json
/// artifacts/<name>/v<N>/<file_name>
/// runs/<run_id>.json
/// ```
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    root: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn artifact_dir(&self, name: &str) -> PathBuf {
        self.root.join("artifacts").join(name)
    }

    fn manifest_path(&self, name: &str) -> PathBuf {
        self.artifact_dir(name).join("manifest.json")
    }

    fn version_file(&self, record: &ArtifactRecord) -> PathBuf {
        self.artifact_dir(&record.name)
            .join(format!("v{}", record.version))
            .join(&record.file_name)
    }

    fn run_path(&self, run_id: &str) -> PathBuf {
        self.root.join("runs").join(format!("{}.json", run_id))
    }

    pub async fn load_manifest(&self, name: &str) -> Result<Option<ArtifactManifest>> {
        let path = self.manifest_path(name);
        if !fs::try_exists(&path)
            .await
            .map_err(|e| CleaningError::file_operation(&path, e))?
        {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .await
            .map_err(|e| CleaningError::file_operation(&path, e))?;
        let manifest = serde_json::from_str(&contents).map_err(|e| {
            CleaningError::Store(format!("Corrupt manifest {}: {}", path.display(), e))
        })?;
        Ok(Some(manifest))
    }

    async fn save_manifest(&self, manifest: &ArtifactManifest) -> Result<()> {
        let path = self.manifest_path(&manifest.name);
        write_json(&path, manifest).await
    }

    pub async fn resolve(&self, reference: &ArtifactRef) -> Result<ArtifactRecord> {
        let manifest = self
            .load_manifest(&reference.name)
            .await?
            .ok_or_else(|| CleaningError::NotFound(reference.to_string()))?;

        manifest
            .get(reference.version)
            .cloned()
            .ok_or_else(|| CleaningError::NotFound(reference.to_string()))
    }

    pub async fn load_run(&self, run_id: &str) -> Result<RunRecord> {
        let path = self.run_path(run_id);
        let contents = fs::read_to_string(&path)
            .await
            .map_err(|e| CleaningError::file_operation(&path, e))?;
        Ok(serde_json::from_str(&contents)?)
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| CleaningError::file_operation(parent, e))?;
    }

    let contents = serde_json::to_string_pretty(value)?;
    fs::write(path, contents)
        .await
        .map_err(|e| CleaningError::file_operation(path, e))
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn start_run(&self, job_type: &str, config: serde_json::Value) -> Result<RunRecord> {
        let run = RunRecord::new(job_type, config);
        write_json(&self.run_path(&run.id), &run).await?;
        debug!("Started run {} ({})", run.id, run.job_type);
        Ok(run)
    }

    async fn fetch(&self, run: &mut RunRecord, reference: &ArtifactRef) -> Result<PathBuf> {
        let record = self.resolve(reference).await?;
        let path = self.version_file(&record);
        Validator::validate_file_path(&path)
            .map_err(|_| CleaningError::NotFound(format!("{} (file missing)", reference)))?;

        run.record_use(record.qualified_name());
        debug!("Resolved {} to {}", reference, path.display());
        Ok(path)
    }

    async fn publish(&self, run: &mut RunRecord, artifact: NewArtifact) -> Result<ArtifactRecord> {
        Validator::validate_artifact_name(&artifact.name)?;
        let file_name = artifact.file_name()?;

        let content = fs::read(&artifact.path)
            .await
            .map_err(|e| CleaningError::file_operation(&artifact.path, e))?;

        let mut manifest = self
            .load_manifest(&artifact.name)
            .await?
            .unwrap_or_else(|| ArtifactManifest {
                name: artifact.name.clone(),
                versions: Vec::new(),
            });

        let record = ArtifactRecord {
            name: artifact.name.clone(),
            version: manifest.next_version(),
            artifact_type: artifact.artifact_type,
            description: artifact.description,
            file_name,
            digest: compute_digest(&content),
            size_bytes: content.len() as u64,
            created_at: Utc::now().to_rfc3339(),
            producer_run: Some(run.id.clone()),
        };

        let target = self.version_file(&record);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| CleaningError::file_operation(parent, e))?;
        }
        fs::write(&target, &content)
            .await
            .map_err(|e| CleaningError::file_operation(&target, e))?;

        manifest.versions.push(record.clone());
        self.save_manifest(&manifest).await?;

        run.record_output(record.qualified_name());
        info!(
            "Registered {} ({} bytes) in {}",
            record.qualified_name(),
            record.size_bytes,
            self.root.display()
        );
        Ok(record)
    }

    async fn finish_run(&self, run: &RunRecord) -> Result<()> {
        write_json(&self.run_path(&run.id), run).await
    }
}
