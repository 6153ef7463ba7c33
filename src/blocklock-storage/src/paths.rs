//! OS-aware path detection for Blocklock storage.
//!
//! - **Windows**: `%APPDATA%\Blocklock\`
//! - **macOS**: `~/Library/Application Support/Blocklock/`
//! - **Linux**: `~/.local/share/Blocklock/`
//!
//! The environment variable names are defined here, but the override
//! chain (flags, environment, settings file, OS default) is resolved by the
//! host. Hosts normally point the privilege list at the server's own
//! `ops.json`.

use std::path::PathBuf;
use tracing::debug;

use crate::error::{Result, StorageError};

/// Application name used for storage directories.
pub const APP_NAME: &str = "Blocklock";

/// File names.
pub const PROTECTED_BLOCKS_FILE: &str = "protected_blocks.json";
pub const PRIVILEGE_FILE: &str = "ops.json";

/// Environment overrides.
pub const DATA_DIR_ENV: &str = "BLOCKLOCK_DATA_DIR";
pub const PRIVILEGE_FILE_ENV: &str = "BLOCKLOCK_PRIVILEGE_FILE";

/// Blocklock storage paths container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlocklockPaths {
    /// Root data directory.
    pub data_dir: PathBuf,
    /// Persisted protected set.
    pub protected_blocks_file: PathBuf,
    /// Externally maintained privilege list.
    pub privilege_file: PathBuf,
}

impl BlocklockPaths {
    /// Create paths from a custom root directory.
    pub fn from_root(data_dir: PathBuf) -> Self {
        Self {
            protected_blocks_file: data_dir.join(PROTECTED_BLOCKS_FILE),
            privilege_file: data_dir.join(PRIVILEGE_FILE),
            data_dir,
        }
    }

    /// Builder: read the privilege list from elsewhere.
    #[must_use]
    pub fn with_privilege_file(mut self, path: PathBuf) -> Self {
        self.privilege_file = path;
        self
    }

    /// Ensure the data directory exists.
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        debug!(data_dir = %self.data_dir.display(), "Blocklock data directory initialized");
        Ok(())
    }
}

/// OS default data directory, ignoring any override.
pub fn default_data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().ok_or(StorageError::HomeDirNotFound)?;
    Ok(base.join(APP_NAME))
}
