//! Document loading from files and strings.
//!
//! JSON and YAML sources both decode into the same tagged tree
//! (`serde_json::Value`); the file extension picks the decoder.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::LoadError;

/// Source format of a schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Pick the format from a file extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `LoadError::UnsupportedFormat` for anything but `.json`,
    /// `.yml` and `.yaml`.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Ok(Format::Json),
            "yml" | "yaml" => Ok(Format::Yaml),
            _ => Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

/// Parse a document from a string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` or `LoadError::InvalidYaml`.
pub fn parse_str(content: &str, format: Format) -> Result<Value, LoadError> {
    match format {
        Format::Json => {
            serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
        }
        Format::Yaml => {
            serde_yaml::from_str(content).map_err(|source| LoadError::InvalidYaml { source })
        }
    }
}

/// Read and parse a document from a file path.
///
/// # Errors
///
/// Returns `LoadError::UnsupportedFormat` before touching the file if the
/// extension is unknown, `LoadError::FileNotFound` if the file doesn't exist,
/// or a parse error if its content is invalid.
pub fn load_tree(path: &Path) -> Result<Value, LoadError> {
    let format = Format::from_path(path)?;
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    parse_str(&content, format)
}

/// All regular files under `dir`, recursively, sorted by path.
///
/// Symlinks are followed. Entries the walk cannot read (permission errors,
/// symlink loops) are logged and skipped.
///
/// # Errors
///
/// Returns `LoadError::NotADirectory` if `dir` is missing or a file.
pub fn collect_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let files = WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(
                    path = ?e.path(),
                    error = %e,
                    "skipping unreadable directory entry"
                );
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();
    Ok(files)
}

/// Convert every YAML document under `src` into pretty JSON inside `dst`.
///
/// `dst` is created if missing. Files that are not YAML are ignored. Each
/// output is named after its source file stem with a `.json` extension.
/// Returns the written paths.
///
/// # Errors
///
/// Stops at the first file that cannot be read, parsed or written.
pub fn generate_json(src: &Path, dst: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let files = collect_files(src)?;
    fs::create_dir_all(dst).map_err(|source| LoadError::WriteError {
        path: dst.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();
    for file in files {
        if Format::from_path(&file).ok() != Some(Format::Yaml) {
            continue;
        }
        let tree = load_tree(&file)?;
        let json =
            serde_json::to_vec_pretty(&tree).map_err(|source| LoadError::InvalidJson { source })?;

        let stem = file.file_stem().unwrap_or_default().to_string_lossy();
        let out = dst.join(format!("{}.json", stem));
        fs::write(&out, json).map_err(|source| LoadError::WriteError {
            path: out.clone(),
            source,
        })?;
        debug!(src = %file.display(), dst = %out.display(), "converted YAML to JSON");
        written.push(out);
    }
    Ok(written)
}
