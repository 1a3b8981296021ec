//! Per-run documentation settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Documentation metadata shared by the text renderer and the Swagger
/// projection.
///
/// Read from an optional JSON file; keys missing from the file keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    pub title: String,
    pub base_url: String,
    pub content_type: String,
    pub headers: Vec<String>,
    pub version: String,
    pub description: String,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            title: "API Document".to_string(),
            base_url: "http://localhost".to_string(),
            content_type: "application/json".to_string(),
            headers: vec!["Content-Type: application/json".to_string()],
            version: "1.0.0".to_string(),
            description: String::new(),
        }
    }
}

impl Meta {
    /// Load settings from `path`, or the defaults when no path is given.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::FileNotFound` / `LoadError::ReadError` if the file
    /// can't be read, `LoadError::InvalidJson` if it isn't valid JSON.
    pub fn load(path: Option<&Path>) -> Result<Self, LoadError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Err(LoadError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse settings from a JSON string.
    pub fn from_json(content: &str) -> Result<Self, LoadError> {
        serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
    }

    /// Set the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the document title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}
