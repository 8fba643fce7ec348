//! Error types for tree fingerprinting and the surrounding application.

use std::path::PathBuf;
use thiserror::Error;

/// Per-node fingerprinting errors
///
/// Inside the engine every variant is contained at the node where it occurs;
/// only the error for the literal requested root reaches the caller.
#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("Path not found: {0:?}")]
    PathNotFound(PathBuf),

    #[error("Unsupported node kind: {0:?}")]
    UnsupportedKind(PathBuf),

    #[error("Failed to read file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to enumerate directory {path:?}: {source}")]
    Enumeration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FingerprintError {
    /// Path of the node that failed
    pub fn path(&self) -> &std::path::Path {
        match self {
            FingerprintError::PathNotFound(path) | FingerprintError::UnsupportedKind(path) => path,
            FingerprintError::Read { path, .. } | FingerprintError::Enumeration { path, .. } => {
                path
            }
        }
    }

    /// Short machine-friendly name of the failure category
    pub fn kind_name(&self) -> &'static str {
        match self {
            FingerprintError::PathNotFound(_) => "path_not_found",
            FingerprintError::UnsupportedKind(_) => "unsupported_kind",
            FingerprintError::Read { .. } => "read_error",
            FingerprintError::Enumeration { .. } => "enumeration_error",
        }
    }
}

/// Application-level errors (configuration, logging, span export)
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown algorithm: {0} (must be 'sha256', 'blake3', or 'checksum')")]
    UnknownAlgorithm(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Span export failed: {0}")]
    Export(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Export(err.to_string())
    }
}
