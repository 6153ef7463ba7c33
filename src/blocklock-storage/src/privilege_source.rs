//! Externally maintained privilege list (`ops.json`).
//!
//! Blocklock never writes this file. Each entry is validated on its own, so
//! one malformed operator record cannot hide the others.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use blocklock_policy::{PrincipalId, PrivilegeTable};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config_store::json_type;
use crate::error::StorageError;

/// One-shot loader for the privilege list.
#[derive(Debug, Clone)]
pub struct PrivilegeSource {
    path: PathBuf,
}

impl PrivilegeSource {
    /// Source backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the list.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot the list. Never fails; problems degrade to fewer entries.
    pub fn load(&self) -> PrivilegeTable {
        match self.try_load() {
            Ok(table) => table,
            Err(e) => {
                warn!(error = %e, "Could not load privilege list, continuing without it");
                PrivilegeTable::new()
            }
        }
    }

    /// Snapshot the list, reporting a document-level failure.
    ///
    /// A missing file is not a failure. Malformed entries are skipped either way.
    pub fn try_load(&self) -> Result<PrivilegeTable, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No privilege list found");
                return Ok(PrivilegeTable::new());
            }
            Err(e) => return Err(self.unavailable(e.to_string())),
        };

        let entries = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Array(entries)) => entries,
            Ok(other) => {
                return Err(self.unavailable(format!("expected an array, found {}", json_type(&other))));
            }
            Err(e) => return Err(self.unavailable(e.to_string())),
        };

        let mut levels = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            match parse_entry(entry) {
                Ok((id, level)) => {
                    if let Some(previous) = levels.insert(id, level) {
                        debug!(principal = %id, previous, level, "Duplicate privilege entry, keeping the later one");
                    }
                }
                Err(reason) => {
                    warn!(path = %self.path.display(), index, reason = %reason, "Skipping privilege entry");
                }
            }
        }

        info!(path = %self.path.display(), count = levels.len(), "Loaded privilege list");
        Ok(PrivilegeTable::from(levels))
    }

    fn unavailable(&self, reason: String) -> StorageError {
        StorageError::PrivilegeSourceUnavailable {
            path: self.path.clone(),
            reason,
        }
    }
}

fn parse_entry(entry: &Value) -> Result<(PrincipalId, i64), String> {
    let object = entry
        .as_object()
        .ok_or_else(|| format!("expected an object, found {}", json_type(entry)))?;

    let id = object
        .get("uuid")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing `uuid` string".to_string())?;
    let id = PrincipalId::parse(id).map_err(|e| e.to_string())?;

    let level = object
        .get("level")
        .and_then(Value::as_i64)
        .ok_or_else(|| "missing or non-integer `level`".to_string())?;

    Ok((id, level))
}
