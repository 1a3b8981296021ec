//! Schema validation - checks documents are well-formed JSON Schemas.
//!
//! Documents are validated as instances of the draft-4 meta-schema rather
//! than compiled, so cross-document `$ref`s and hyper-schema `$schema` URLs
//! are never fetched.

use std::path::Path;

use jsonschema::Validator;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::{LoadError, ValidateError, Violation};
use crate::loader::{collect_files, load_tree};

/// URI of the draft-4 meta-schema. `jsonschema` bundles the document, so
/// nothing is fetched.
const DRAFT4_META_SCHEMA: &str = "http://json-schema.org/draft-04/schema#";

/// Validate a JSON rendering of a schema document as a draft-4 JSON Schema.
///
/// # Errors
///
/// Returns `ValidateError::Load` if the bytes aren't JSON, or
/// `ValidateError::Invalid` with every violation of the meta-schema.
pub fn validate_schema(json: &[u8]) -> Result<(), ValidateError> {
    let schema: Value = serde_json::from_slice(json)
        .map_err(|source| ValidateError::Load(LoadError::InvalidJson { source }))?;
    validate_value(&schema)
}

/// Validate an already parsed document as a draft-4 JSON Schema.
pub fn validate_value(schema: &Value) -> Result<(), ValidateError> {
    let errors = violations(&meta_validator()?, schema);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::Invalid { errors })
    }
}

fn meta_validator() -> Result<Validator, ValidateError> {
    jsonschema::draft4::new(&json!({ "$ref": DRAFT4_META_SCHEMA })).map_err(|e| {
        ValidateError::MetaSchema {
            message: e.to_string(),
        }
    })
}

fn violations(validator: &Validator, schema: &Value) -> Vec<Violation> {
    validator
        .iter_errors(schema)
        .map(|e| Violation {
            file: None,
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect()
}

/// Validate every loadable document under `dir`.
///
/// Files with an unsupported extension are skipped, as in a directory load.
/// Violations from all files are collected before returning.
///
/// # Errors
///
/// Returns `ValidateError::Load` if `dir` is not a directory or a file can't
/// be read or parsed, `ValidateError::Invalid` with every violation found
/// otherwise.
pub fn validate_tree(dir: &Path) -> Result<(), ValidateError> {
    let validator = meta_validator()?;
    let mut errors = Vec::new();

    for file in collect_files(dir)? {
        let tree = match load_tree(&file) {
            Ok(tree) => tree,
            Err(LoadError::UnsupportedFormat { .. }) => {
                warn!(path = %file.display(), "skipping file with unsupported format");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        debug!(path = %file.display(), "validating schema");
        errors.extend(
            violations(&validator, &tree)
                .into_iter()
                .map(|v| Violation {
                    file: Some(file.clone()),
                    ..v
                }),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::Invalid { errors })
    }
}
