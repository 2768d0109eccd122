//! Error types for the onboarding registry.

use std::path::PathBuf;

/// Top-level error type for the registry.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// Flat-file persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize {what}: {source}")]
    Serialize {
        what: String,
        source: serde_yaml::Error,
    },
}

/// Errors surfaced at the HTTP boundary.
///
/// Stores and the resolution engine signal absence with `Option`; handlers
/// translate that into `NotFound` here. Only persistence faults reach the
/// `Storage` variant.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Result type alias for the registry.
pub type Result<T> = std::result::Result<T, Error>;
