// file: src/utils/validation.rs
// description: data validation utilities and helpers
// reference: input validation patterns

use crate::error::{CleaningError, Result};
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_file_path(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(CleaningError::NotFound(format!(
                "file does not exist: {}",
                path.display()
            )));
        }

        if !path.is_file() {
            return Err(CleaningError::Validation(format!(
                "Path is not a file: {}",
                path.display()
            )));
        }

        Ok(())
    }

    /// Artifact names double as file and directory names, so they are
    /// restricted to a portable character set.
    pub fn validate_artifact_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(CleaningError::Validation(
                "Artifact name is empty".to_string(),
            ));
        }

        if name == "." || name == ".." {
            return Err(CleaningError::Validation(format!(
                "Invalid artifact name: {}",
                name
            )));
        }

        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        {
            return Err(CleaningError::Validation(format!(
                "Invalid character {:?} in artifact name: {}",
                c, name
            )));
        }

        Ok(())
    }

    pub fn validate_not_empty(field: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(CleaningError::Validation(format!("{} is empty", field)));
        }
        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(CleaningError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    pub fn is_inverted_range(min: f64, max: f64) -> bool {
        min > max
    }

    pub fn truncate_text(text: &str, max_length: usize) -> String {
        match text.char_indices().nth(max_length) {
            Some((idx, _)) => format!("{}...", &text[..idx]),
            None => text.to_string(),
        }
    }
}
