//! Persisted protected set (`protected_blocks.json`).
//!
//! The document is a projection of the in-memory set, never a second source
//! of truth: every save rewrites it completely.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use blocklock_policy::{ResourceCatalog, ResourceKind};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::atomic::atomic_write;
use crate::error::{Result, StorageError};

/// Top-level key of the document.
pub const PROTECTED_BLOCKS_KEY: &str = "protected_blocks";

/// Set of protected kinds. Iterates in canonical order.
pub type ProtectedSet = BTreeSet<ResourceKind>;

/// Outcome of reading the document.
///
/// `protected` is always usable; the other fields say what was dropped on the
/// way and why.
#[derive(Debug, Default)]
pub struct ConfigLoad {
    /// Kinds that resolved and may be protected.
    pub protected: ProtectedSet,
    /// Raw entries that were skipped.
    pub rejected: Vec<String>,
    /// Set when the document as a whole could not be used.
    pub error: Option<StorageError>,
}

impl ConfigLoad {
    /// True when every entry was accepted.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.error.is_none()
    }
}

#[derive(Serialize)]
struct StoredDocument<'a> {
    protected_blocks: Vec<&'a str>,
}

/// Loads and saves the protected set document.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document, falling back to an empty set on any failure.
    ///
    /// A missing document is materialized immediately with an empty set.
    pub fn load(&self, catalog: &(impl ResourceCatalog + ?Sized)) -> ConfigLoad {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No protected blocks config, creating one");
                let loaded = ConfigLoad::default();
                if let Err(e) = self.save(&loaded.protected) {
                    warn!(path = %self.path.display(), error = %e, "Failed to create protected blocks config");
                }
                return loaded;
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to read protected blocks config");
                return ConfigLoad {
                    error: Some(StorageError::Io(e)),
                    ..Default::default()
                };
            }
        };

        let loaded = self.parse(&content, catalog);
        info!(
            path = %self.path.display(),
            count = loaded.protected.len(),
            rejected = loaded.rejected.len(),
            "Loaded protected blocks"
        );
        loaded
    }

    /// Overwrite the document with `protected`.
    pub fn save(&self, protected: &ProtectedSet) -> Result<()> {
        let document = StoredDocument {
            protected_blocks: protected.iter().map(ResourceKind::as_str).collect(),
        };
        let mut content = serde_json::to_vec_pretty(&document)?;
        content.push(b'\n');
        atomic_write(&self.path, &content)?;

        debug!(path = %self.path.display(), count = protected.len(), "Protected blocks saved");
        Ok(())
    }

    fn parse(&self, content: &str, catalog: &(impl ResourceCatalog + ?Sized)) -> ConfigLoad {
        let document: Value = match serde_json::from_str(content) {
            Ok(document) => document,
            Err(e) => return self.corrupt(e.to_string()),
        };

        let entries = match document {
            Value::Null => return ConfigLoad::default(),
            Value::Object(mut map) => match map.remove(PROTECTED_BLOCKS_KEY) {
                None | Some(Value::Null) => return ConfigLoad::default(),
                Some(Value::Array(entries)) => entries,
                Some(other) => {
                    return self.corrupt(format!(
                        "`{PROTECTED_BLOCKS_KEY}` must be an array, found {}",
                        json_type(&other)
                    ));
                }
            },
            other => {
                return self.corrupt(format!("expected an object, found {}", json_type(&other)));
            }
        };

        let mut loaded = ConfigLoad::default();
        for entry in entries {
            let accepted = entry
                .as_str()
                .and_then(|name| catalog.resolve(name))
                .filter(|kind| catalog.is_protectable(kind));

            match accepted {
                Some(kind) => {
                    if !loaded.protected.insert(kind.clone()) {
                        debug!(kind = %kind, "Duplicate entry in protected blocks config");
                    }
                }
                None => {
                    let raw = match entry {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    warn!(path = %self.path.display(), entry = %raw, "Invalid material in config");
                    loaded.rejected.push(raw);
                }
            }
        }
        loaded
    }

    fn corrupt(&self, reason: String) -> ConfigLoad {
        error!(path = %self.path.display(), reason = %reason, "Protected blocks config is corrupt, starting empty");
        ConfigLoad {
            error: Some(StorageError::ConfigCorrupt {
                path: self.path.clone(),
                reason,
            }),
            ..Default::default()
        }
    }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
