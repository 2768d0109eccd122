//! YAML flat-file helpers shared by the content and account stores.
//!
//! Every backing file is human-editable YAML. Writes go through a
//! temp-file-then-rename cycle so a crash mid-write never leaves a
//! truncated catalog behind.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

/// Read and parse one YAML file.
pub fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let text = std::fs::read_to_string(path).map_err(|source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&text).map_err(|source| StorageError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `value` to YAML and write it to `path` via a temp file rename.
pub fn save_yaml<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let text = serde_yaml::to_string(value).map_err(|source| StorageError::Serialize {
        what: path.display().to_string(),
        source,
    })?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| StorageError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let tmp = path.with_extension("yaml.tmp");
    std::fs::write(&tmp, text).map_err(|source| StorageError::Write {
        path: tmp.clone(),
        source,
    })?;
    std::fs::rename(&tmp, path).map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Load one array-of-records catalog file.
///
/// A missing or unreadable file leaves the category empty; individual
/// records that fail to deserialize are skipped, so one malformed entry
/// cannot drop its whole category.
pub fn load_catalog<T: DeserializeOwned>(path: &Path, what: &str) -> Vec<T> {
    let raw: Vec<serde_yaml::Value> = match load_yaml(path) {
        Ok(values) => values,
        Err(e) => {
            tracing::warn!(category = what, error = %e, "Catalog file unavailable, starting empty");
            return Vec::new();
        }
    };

    let mut records = Vec::with_capacity(raw.len());
    for (index, value) in raw.into_iter().enumerate() {
        match serde_yaml::from_value(value) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(category = what, index, error = %e, "Skipping malformed record");
            }
        }
    }
    records
}

/// Remove a backing file if it exists. Returns whether a file was removed.
pub fn remove_file(path: &Path) -> Result<bool, StorageError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(StorageError::Write {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// List the `.yaml` files directly under `dir`, sorted by file name so
/// load order is stable across platforms.
pub fn yaml_files_in(dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
    let entries = std::fs::read_dir(dir).map_err(|source| StorageError::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("yaml"))
        .collect();
    paths.sort();
    Ok(paths)
}
