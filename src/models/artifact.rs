// file: src/models/artifact.rs
// description: artifact references, published artifact records and upload payloads
// reference: internal data structures

use crate::error::{CleaningError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::PathBuf;

lazy_static! {
    static ref ARTIFACT_REF: Regex = Regex::new(
        r"^(?:[A-Za-z0-9._-]+/){0,2}(?P<name>[A-Za-z0-9._-]+)(?::(?P<version>latest|v[0-9]+))?$"
    ).expect("ARTIFACT_REF regex is valid");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactVersion {
    Latest,
    Number(u32),
}

impl fmt::Display for ArtifactVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::Number(n) => write!(f, "v{}", n),
        }
    }
}

/// `name` or `name:version` where version is `latest` or `v<N>`.
/// A leading `entity/project/` or `project/` scope is accepted and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    pub name: String,
    pub version: ArtifactVersion,
}

impl ArtifactRef {
    pub fn parse(reference: &str) -> Result<Self> {
        let caps = ARTIFACT_REF.captures(reference.trim()).ok_or_else(|| {
            CleaningError::Validation(format!("Invalid artifact reference: {}", reference))
        })?;

        let name = caps["name"].to_string();
        if name == "." || name == ".." {
            return Err(CleaningError::Validation(format!(
                "Invalid artifact reference: {}",
                reference
            )));
        }

        let version = match caps.name("version").map(|m| m.as_str()) {
            None | Some("latest") => ArtifactVersion::Latest,
            Some(v) => {
                let number = v[1..].parse::<u32>().map_err(|_| {
                    CleaningError::Validation(format!("Invalid artifact version: {}", v))
                })?;
                ArtifactVersion::Number(number)
            }
        };

        Ok(Self { name, version })
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}

/// A registered artifact version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub name: String,
    pub version: u32,
    #[serde(rename = "type")]
    pub artifact_type: String,
    pub description: String,
    pub file_name: String,
    pub digest: String,
    pub size_bytes: u64,
    pub created_at: String,
    #[serde(default)]
    pub producer_run: Option<String>,
}

impl ArtifactRecord {
    pub fn qualified_name(&self) -> String {
        format!("{}:v{}", self.name, self.version)
    }
}

/// An artifact about to be published
#[derive(Debug, Clone)]
pub struct NewArtifact {
    pub name: String,
    pub artifact_type: String,
    pub description: String,
    pub path: PathBuf,
}

impl NewArtifact {
    pub fn file_name(&self) -> Result<String> {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string())
            .ok_or_else(|| {
                CleaningError::Validation(format!(
                    "Artifact path has no file name: {}",
                    self.path.display()
                ))
            })
    }
}

pub fn compute_digest(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}
