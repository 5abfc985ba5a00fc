// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{CleaningError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub store: StoreConfig,
    pub output: OutputConfig,
    pub run: RunConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Local,
    Http,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub root: PathBuf,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    pub project: String,
    pub cache_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunConfig {
    pub job_type: String,
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,
}

fn default_show_progress() -> bool {
    true
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = Self::default_config();
        let mut builder = config::Config::builder()
            .set_default("store.backend", "local")
            .and_then(|b| b.set_default("store.root", path_string(&defaults.store.root)))
            .and_then(|b| b.set_default("store.project", defaults.store.project.clone()))
            .and_then(|b| {
                b.set_default("store.cache_dir", path_string(&defaults.store.cache_dir))
            })
            .and_then(|b| b.set_default("output.dir", path_string(&defaults.output.dir)))
            .and_then(|b| b.set_default("run.job_type", defaults.run.job_type.clone()))
            .and_then(|b| b.set_default("run.show_progress", defaults.run.show_progress))
            .map_err(|e| CleaningError::Config(e.to_string()))?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(
                config::File::from(Path::new("config/default.toml")).required(false),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix("BASIC_CLEANING")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| CleaningError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| CleaningError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            store: StoreConfig {
                backend: StoreBackend::Local,
                root: PathBuf::from("./artifact_store"),
                base_url: None,
                api_key: None,
                project: "nyc_airbnb".to_string(),
                cache_dir: PathBuf::from("./artifact_cache"),
            },
            output: OutputConfig {
                dir: PathBuf::from("."),
            },
            run: RunConfig {
                job_type: "basic_cleaning".to_string(),
                show_progress: true,
            },
        }
    }

    fn validate(&self) -> Result<()> {
        if self.run.job_type.trim().is_empty() {
            return Err(CleaningError::Config(
                "run.job_type must not be empty".to_string(),
            ));
        }

        if self.store.project.trim().is_empty() {
            return Err(CleaningError::Config(
                "store.project must not be empty".to_string(),
            ));
        }

        if self.store.backend == StoreBackend::Http {
            let url = self.store.base_url.as_deref().ok_or_else(|| {
                CleaningError::Config("store.base_url is required for the http backend".to_string())
            })?;
            Validator::validate_url(url)
                .map_err(|e| CleaningError::Config(format!("store.base_url: {}", e)))?;
        }

        Ok(())
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.store.backend, StoreBackend::Local);
        assert_eq!(config.run.job_type, "basic_cleaning");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cleaning.toml");
        fs::write(
            &path,
            r#"
[store]
backend = "local"
root = "/tmp/registry"
project = "listings"
cache_dir = "/tmp/cache"

[output]
dir = "/tmp/out"

[run]
job_type = "cleaning_nightly"
show_progress = false
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.store.root, PathBuf::from("/tmp/registry"));
        assert_eq!(config.store.project, "listings");
        assert_eq!(config.output.dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.run.job_type, "cleaning_nightly");
        assert!(!config.run.show_progress);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        fs::write(&path, "[output]\ndir = \"cleaned\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.output.dir, PathBuf::from("cleaned"));
        assert_eq!(config.store.backend, StoreBackend::Local);
        assert_eq!(config.run.job_type, "basic_cleaning");
    }

    #[test]
    fn test_http_backend_requires_base_url() {
        let mut config = Config::default_config();
        config.store.backend = StoreBackend::Http;
        assert!(config.validate().is_err());

        config.store.base_url = Some("registry.internal".to_string());
        assert!(config.validate().is_err());

        config.store.base_url = Some("https://registry.example.com".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_job_type_rejected() {
        let mut config = Config::default_config();
        config.run.job_type = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
