// file: src/store/http.rs
// description: REST client for a remote artifact registry
// reference: https://docs.rs/reqwest

use crate::config::StoreConfig;
use crate::error::{CleaningError, Result};
use crate::models::{ArtifactRecord, ArtifactRef, NewArtifact, RunRecord, compute_digest};
use crate::store::ArtifactStore;
use crate::utils::Validator;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info};

pub struct HttpArtifactStore {
    client: Client,
    base_url: String,
    project: String,
    api_key: Option<String>,
    cache_dir: PathBuf,
}

impl HttpArtifactStore {
    pub fn new(
        base_url: &str,
        project: &str,
        api_key: Option<String>,
        cache_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        Validator::validate_url(base_url)?;
        Validator::validate_not_empty("project", project)?;

        Ok(Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            project: project.to_string(),
            api_key,
            cache_dir: cache_dir.into(),
        })
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let base_url = config.base_url.as_deref().ok_or_else(|| {
            CleaningError::Config("store.base_url is required for the http backend".to_string())
        })?;
        Self::new(
            base_url,
            &config.project,
            config.api_key.clone(),
            config.cache_dir.clone(),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/projects/{}/{}", self.base_url, self.project, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    fn cached_file(&self, record: &ArtifactRecord) -> PathBuf {
        self.cache_dir
            .join(&record.name)
            .join(format!("v{}", record.version))
            .join(&record.file_name)
    }

    async fn send(&self, request: RequestBuilder, context: &str) -> Result<Response> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| CleaningError::Store(format!("{}: {}", context, e)))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(CleaningError::Store(format!(
            "{} failed with status {}: {}",
            context, status, error_text
        )))
    }

    async fn resolve(&self, reference: &ArtifactRef) -> Result<ArtifactRecord> {
        let url = self.url(&format!(
            "artifacts/{}/{}",
            reference.name, reference.version
        ));
        debug!("Resolving {} via {}", reference, url);

        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(|e| CleaningError::Store(format!("Failed to resolve {}: {}", reference, e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(CleaningError::NotFound(reference.to_string()));
        }
        if !response.status().is_success() {
            return Err(CleaningError::Store(format!(
                "Resolving {} failed with status {}",
                reference,
                response.status()
            )));
        }

        response.json::<ArtifactRecord>().await.map_err(|e| {
            CleaningError::Store(format!("Failed to parse artifact record: {}", e))
        })
    }

    async fn download(&self, record: &ArtifactRecord) -> Result<PathBuf> {
        let target = self.cached_file(record);

        if let Ok(existing) = fs::read(&target).await {
            if compute_digest(&existing) == record.digest {
                debug!("Using cached copy of {}", record.qualified_name());
                return Ok(target);
            }
        }

        let url = self.url(&format!(
            "artifacts/{}/v{}/file",
            record.name, record.version
        ));
        let response = self
            .send(
                self.client.get(&url),
                &format!("Downloading {}", record.qualified_name()),
            )
            .await?;
        let content = response.bytes().await?;

        if compute_digest(&content) != record.digest {
            return Err(CleaningError::Store(format!(
                "Digest mismatch for {}",
                record.qualified_name()
            )));
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| CleaningError::file_operation(parent, e))?;
        }
        fs::write(&target, &content)
            .await
            .map_err(|e| CleaningError::file_operation(&target, e))?;

        info!(
            "Downloaded {} ({} bytes)",
            record.qualified_name(),
            content.len()
        );
        Ok(target)
    }
}

#[async_trait]
impl ArtifactStore for HttpArtifactStore {
    async fn start_run(&self, job_type: &str, config: serde_json::Value) -> Result<RunRecord> {
        let run = RunRecord::new(job_type, config);
        let response = self
            .send(
                self.client.post(self.url("runs")).json(&run),
                "Creating run",
            )
            .await?;

        response
            .json::<RunRecord>()
            .await
            .map_err(|e| CleaningError::Store(format!("Failed to parse run record: {}", e)))
    }

    async fn fetch(&self, run: &mut RunRecord, reference: &ArtifactRef) -> Result<PathBuf> {
        let record = self.resolve(reference).await?;
        let path = self.download(&record).await?;
        run.record_use(record.qualified_name());
        Ok(path)
    }

    async fn publish(&self, run: &mut RunRecord, artifact: NewArtifact) -> Result<ArtifactRecord> {
        Validator::validate_artifact_name(&artifact.name)?;
        let file_name = artifact.file_name()?;

        let content = fs::read(&artifact.path)
            .await
            .map_err(|e| CleaningError::file_operation(&artifact.path, e))?;
        let digest = compute_digest(&content);

        let request = self
            .client
            .post(self.url(&format!("artifacts/{}", artifact.name)))
            .query(&[
                ("type", artifact.artifact_type.as_str()),
                ("description", artifact.description.as_str()),
                ("file_name", file_name.as_str()),
                ("run_id", run.id.as_str()),
                ("digest", digest.as_str()),
            ])
            .header("Content-Type", "text/csv")
            .body(content);

        let response = self
            .send(request, &format!("Publishing {}", artifact.name))
            .await?;
        let record: ArtifactRecord = response.json().await.map_err(|e| {
            CleaningError::Store(format!("Failed to parse artifact record: {}", e))
        })?;

        if record.digest != digest {
            return Err(CleaningError::Store(format!(
                "Registry stored {} with a different digest",
                record.qualified_name()
            )));
        }

        run.record_output(record.qualified_name());
        info!("Registered {} at {}", record.qualified_name(), self.base_url);
        Ok(record)
    }

    async fn finish_run(&self, run: &RunRecord) -> Result<()> {
        self.send(
            self.client
                .put(self.url(&format!("runs/{}", run.id)))
                .json(run),
            "Closing run",
        )
        .await?;
        Ok(())
    }
}
