//! `blocklock.toml` loading and path resolution.
//!
//! Precedence, highest first: command-line flags, environment
//! (`BLOCKLOCK_DATA_DIR`, `BLOCKLOCK_PRIVILEGE_FILE`), the settings file,
//! OS defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blocklock_policy::PolicyConfig;
use blocklock_storage::{BlocklockPaths, default_data_dir};
use blocklock_storage::paths::{APP_NAME, DATA_DIR_ENV, PRIVILEGE_FILE_ENV};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Settings file name inside the OS config directory.
pub const SETTINGS_FILE: &str = "blocklock.toml";

/// Contents of `blocklock.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding `protected_blocks.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Privilege list, usually the server's `ops.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privilege_file: Option<PathBuf>,
    #[serde(flatten)]
    pub policy: PolicyConfig,
}

/// Path overrides given on the command line.
#[derive(Debug, Clone, Default)]
pub struct PathFlags {
    pub data_dir: Option<PathBuf>,
    pub privilege_file: Option<PathBuf>,
}

impl Settings {
    /// Load settings.
    ///
    /// With an explicit `path` the file must exist. Without one the default
    /// location is tried and a missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_file(path),
            None => match default_settings_path() {
                Some(path) if path.exists() => Self::load_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parse one settings file.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let settings: Self = toml::from_str(&content)
            .with_context(|| format!("Malformed settings file {}", path.display()))?;
        debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Resolve storage paths against the process environment.
    pub fn resolve_paths(&self, flags: &PathFlags) -> Result<BlocklockPaths> {
        self.resolve_paths_with(flags, |var| std::env::var(var).ok())
    }

    /// Resolve storage paths with an explicit environment lookup.
    pub fn resolve_paths_with(
        &self,
        flags: &PathFlags,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<BlocklockPaths> {
        let env_path = |var: &str| env(var).filter(|v| !v.is_empty()).map(PathBuf::from);

        let data_dir = match flags
            .data_dir
            .clone()
            .or_else(|| env_path(DATA_DIR_ENV))
            .or_else(|| self.data_dir.clone())
        {
            Some(dir) => dir,
            None => default_data_dir()
                .context("Could not determine a data directory; pass --data-dir")?,
        };

        let paths = BlocklockPaths::from_root(data_dir);
        let privilege_file = flags
            .privilege_file
            .clone()
            .or_else(|| env_path(PRIVILEGE_FILE_ENV))
            .or_else(|| self.privilege_file.clone());

        Ok(match privilege_file {
            Some(file) => paths.with_privilege_file(file),
            None => paths,
        })
    }
}

/// `<config dir>/Blocklock/blocklock.toml`, when the OS has a config dir.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join(SETTINGS_FILE))
}
