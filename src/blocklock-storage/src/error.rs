//! Error types for blocklock-storage.

use std::path::PathBuf;
use thiserror::Error;

/// Storage error types.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Protected set document exists but cannot be understood.
    #[error("Corrupt config {path}: {reason}")]
    ConfigCorrupt { path: PathBuf, reason: String },

    /// Privilege list exists but cannot be read as a list.
    #[error("Privilege source unavailable {path}: {reason}")]
    PrivilegeSourceUnavailable { path: PathBuf, reason: String },

    /// Home directory not found.
    #[error("Could not determine home/data directory")]
    HomeDirNotFound,
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
