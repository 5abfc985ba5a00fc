// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CleaningError>;

#[derive(Error, Debug)]
pub enum CleaningError {
    #[error("Artifact not found: {0}")]
    NotFound(String),

    #[error("Failed to parse {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Artifact store error: {0}")]
    Store(String),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Table operation failed: {0}")]
    Table(#[from] arrow_schema::ArrowError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CleaningError {
    pub fn file_operation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileOperation {
            path: path.into(),
            source,
        }
    }

    /// True for the errors that abort a run before anything is written.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Parse { .. } | Self::Schema(_)
        )
    }
}

impl From<serde_json::Error> for CleaningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for CleaningError {
    fn from(err: reqwest::Error) -> Self {
        Self::Store(err.to_string())
    }
}
