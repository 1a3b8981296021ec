//! Error types for schema loading, graph building, synthesis and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while turning a parsed tree into a schema graph.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("malformed document: root must be an object, got {actual}")]
    MalformedRoot { actual: String },
}

impl SchemaError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Errors while reading schema documents from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Format errors (exit code 2)
    #[error("unsupported format \"{extension}\" for {path}: expected .json, .yml or .yaml")]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML: {source}")]
    InvalidYaml {
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. }
            | LoadError::NotADirectory { .. }
            | LoadError::ReadError { .. }
            | LoadError::WriteError { .. } => 3,
            LoadError::Schema(e) => e.exit_code(),
            _ => 2,
        }
    }
}

/// Errors raised by checked example synthesis.
#[derive(Debug, Error)]
pub enum ExampleError {
    #[error("cyclic reference at {path}")]
    CyclicReference { path: String },
}

impl ExampleError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Errors during schema validation.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("validation failed with {} error(s)", errors.len())]
    Invalid { errors: Vec<Violation> },

    #[error("cannot build meta-schema validator: {message}")]
    MetaSchema { message: String },
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::Load(e) => e.exit_code(),
            ValidateError::Invalid { .. } => 1,
            ValidateError::MetaSchema { .. } => 2,
        }
    }
}

/// Single validation failure with path context.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Violation {
    /// Document the failure was found in, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// JSON Pointer (RFC 6901) to the offending location.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}: {}: {}", file.display(), self.path, self.message),
            None => write!(f, "{}: {}", self.path, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_exit_codes() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("user.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = LoadError::UnsupportedFormat {
            path: PathBuf::from("user.txt"),
            extension: "txt".into(),
        };
        assert_eq!(err.exit_code(), 2);

        let err = LoadError::Schema(SchemaError::MalformedRoot {
            actual: "array".into(),
        });
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn validate_error_exit_codes() {
        let err = ValidateError::Invalid {
            errors: vec![Violation {
                file: None,
                path: "/properties".into(),
                message: "[] is not of type \"object\"".into(),
            }],
        };
        assert_eq!(err.exit_code(), 1);

        let err = ValidateError::Load(LoadError::NotADirectory {
            path: PathBuf::from("schemas"),
        });
        assert_eq!(err.exit_code(), 3);

        let err = ValidateError::MetaSchema {
            message: "unknown draft".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn violation_display() {
        let err = Violation {
            file: None,
            path: "/properties".into(),
            message: "expected object".into(),
        };
        assert_eq!(err.to_string(), "/properties: expected object");

        let err = Violation {
            file: Some(PathBuf::from("user.json")),
            ..err
        };
        assert_eq!(err.to_string(), "user.json: /properties: expected object");
    }

    #[test]
    fn malformed_root_display() {
        let err = SchemaError::MalformedRoot {
            actual: "string".into(),
        };
        assert_eq!(
            err.to_string(),
            "malformed document: root must be an object, got string"
        );
    }
}
