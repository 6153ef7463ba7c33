//! The in-memory protected set and its write-through persistence.

use std::sync::Arc;

use blocklock_policy::{ProtectionLookup, ResourceCatalog, ResourceKind};
use blocklock_storage::{ConfigStore, ProtectedSet, StorageError};
use parking_lot::RwLock;
use tracing::{debug, error, info};

/// Result of [`ProtectionRegistry::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Newly protected.
    Added(ResourceKind),
    /// Already in the set; nothing changed.
    AlreadyProtected(ResourceKind),
    /// Name does not resolve to a protectable kind.
    InvalidKind(String),
}

/// Result of [`ProtectionRegistry::remove`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// No longer protected.
    Removed(ResourceKind),
    /// Was not in the set; nothing changed.
    NotProtected(ResourceKind),
    /// Name does not resolve to a known kind.
    InvalidKind(String),
}

/// Outcome of a mutation plus the write-through result.
///
/// A failed write does not undo the mutation: the in-memory set stays
/// authoritative and the document is merely stale until the next save.
#[derive(Debug)]
#[must_use]
pub struct Mutation<T> {
    /// What happened to the set.
    pub outcome: T,
    /// Set when the document could not be rewritten.
    pub persist_error: Option<StorageError>,
}

impl<T> Mutation<T> {
    fn unchanged(outcome: T) -> Self {
        Self {
            outcome,
            persist_error: None,
        }
    }

    /// Whether the document reflects the set after this call.
    pub fn persisted(&self) -> bool {
        self.persist_error.is_none()
    }

    /// Drop the persistence report.
    pub fn into_outcome(self) -> T {
        self.outcome
    }
}

/// Owner of the protected set.
///
/// Share it as `Arc<ProtectionRegistry>`. Mutations hold the write lock
/// across insert/remove and the save, so the document never lags behind a
/// concurrent reader's view.
pub struct ProtectionRegistry {
    catalog: Arc<dyn ResourceCatalog>,
    store: ConfigStore,
    protected: RwLock<ProtectedSet>,
}

impl ProtectionRegistry {
    /// Load the set from `store` and take ownership of it.
    pub fn open(store: ConfigStore, catalog: Arc<dyn ResourceCatalog>) -> Self {
        let loaded = store.load(&*catalog);
        if let Some(e) = &loaded.error {
            error!(error = %e, "Starting with an empty protected set");
        }
        Self::with_protected(store, catalog, loaded.protected)
    }

    /// Build a registry around an already loaded set.
    pub fn with_protected(
        store: ConfigStore,
        catalog: Arc<dyn ResourceCatalog>,
        protected: ProtectedSet,
    ) -> Self {
        Self {
            catalog,
            store,
            protected: RwLock::new(protected),
        }
    }

    /// Protect a kind.
    pub fn add(&self, name: &str) -> Mutation<AddOutcome> {
        let Some(kind) = self
            .catalog
            .resolve(name)
            .filter(|kind| self.catalog.is_protectable(kind))
        else {
            debug!(resource = name, "Rejected unknown or unprotectable resource");
            return Mutation::unchanged(AddOutcome::InvalidKind(name.to_string()));
        };

        let mut protected = self.protected.write();
        if protected.contains(&kind) {
            return Mutation::unchanged(AddOutcome::AlreadyProtected(kind));
        }
        protected.insert(kind.clone());
        let persist_error = self.persist(&protected);
        drop(protected);

        info!(kind = %kind, "Resource protected");
        Mutation {
            outcome: AddOutcome::Added(kind),
            persist_error,
        }
    }

    /// Stop protecting a kind.
    pub fn remove(&self, name: &str) -> Mutation<RemoveOutcome> {
        let Some(kind) = self.catalog.resolve(name) else {
            debug!(resource = name, "Rejected unknown resource");
            return Mutation::unchanged(RemoveOutcome::InvalidKind(name.to_string()));
        };

        let mut protected = self.protected.write();
        if !protected.remove(&kind) {
            return Mutation::unchanged(RemoveOutcome::NotProtected(kind));
        }
        let persist_error = self.persist(&protected);
        drop(protected);

        info!(kind = %kind, "Resource unprotected");
        Mutation {
            outcome: RemoveOutcome::Removed(kind),
            persist_error,
        }
    }

    /// Pure query.
    pub fn is_protected(&self, kind: &ResourceKind) -> bool {
        self.protected.read().contains(kind)
    }

    /// Protected kinds in canonical order.
    pub fn list(&self) -> Vec<ResourceKind> {
        self.protected.read().iter().cloned().collect()
    }

    /// Run `f` against one consistent view of the set.
    pub fn with_snapshot<R>(&self, f: impl FnOnce(&ProtectedSet) -> R) -> R {
        f(&self.protected.read())
    }

    /// Number of protected kinds.
    pub fn len(&self) -> usize {
        self.protected.read().len()
    }

    /// Whether nothing is protected.
    pub fn is_empty(&self) -> bool {
        self.protected.read().is_empty()
    }

    /// Catalog used to validate names.
    pub fn catalog(&self) -> &dyn ResourceCatalog {
        &*self.catalog
    }

    /// Store the set is written through to.
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    fn persist(&self, protected: &ProtectedSet) -> Option<StorageError> {
        let e = self.store.save(protected).err()?;
        error!(
            path = %self.store.path().display(),
            error = %e,
            "Failed to save protected blocks, keeping in-memory set"
        );
        Some(e)
    }
}

impl ProtectionLookup for ProtectionRegistry {
    fn is_protected(&self, kind: &ResourceKind) -> bool {
        ProtectionRegistry::is_protected(self, kind)
    }
}

impl std::fmt::Debug for ProtectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtectionRegistry")
            .field("store", &self.store)
            .field("protected", &*self.protected.read())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use blocklock_policy::MaterialCatalog;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn registry(dir: &std::path::Path) -> ProtectionRegistry {
        ProtectionRegistry::open(
            ConfigStore::new(dir.join("protected_blocks.json")),
            Arc::new(MaterialCatalog::builtin().clone()),
        )
    }

    fn kind(name: &str) -> ResourceKind {
        MaterialCatalog::builtin().resolve(name).unwrap()
    }

    #[test]
    fn test_add_then_remove_round_trip() {
        let dir = tempdir().unwrap();
        let registry = registry(dir.path());

        assert_eq!(registry.add("obsidian").outcome, AddOutcome::Added(kind("obsidian")));
        assert!(registry.is_protected(&kind("obsidian")));

        assert_eq!(
            registry.remove("obsidian").outcome,
            RemoveOutcome::Removed(kind("obsidian"))
        );
        assert!(!registry.is_protected(&kind("obsidian")));
    }

    #[test]
    fn test_add_is_idempotent() {
        let dir = tempdir().unwrap();
        let registry = registry(dir.path());
        let before = registry.len();

        assert_eq!(registry.add("bedrock").outcome, AddOutcome::Added(kind("bedrock")));
        assert_eq!(
            registry.add("BEDROCK").outcome,
            AddOutcome::AlreadyProtected(kind("bedrock"))
        );
        assert_eq!(registry.len(), before + 1);
    }

    #[test]
    fn test_invalid_kind_leaves_set_unchanged() {
        let dir = tempdir().unwrap();
        let registry = registry(dir.path());
        registry.add("bedrock").into_outcome();

        assert_eq!(
            registry.add("not_a_real_resource").outcome,
            AddOutcome::InvalidKind("not_a_real_resource".into())
        );
        assert_eq!(
            registry.remove("not_a_real_resource").outcome,
            RemoveOutcome::InvalidKind("not_a_real_resource".into())
        );
        assert_eq!(registry.list(), vec![kind("bedrock")]);
    }

    #[test]
    fn test_items_cannot_be_protected_but_can_be_named_for_removal() {
        let dir = tempdir().unwrap();
        let registry = registry(dir.path());

        assert_eq!(registry.add("stick").outcome, AddOutcome::InvalidKind("stick".into()));
        assert_eq!(
            registry.remove("stick").outcome,
            RemoveOutcome::NotProtected(kind("stick"))
        );
    }

    #[test]
    fn test_list_is_sorted() {
        let dir = tempdir().unwrap();
        let registry = registry(dir.path());
        for name in ["tnt", "Bedrock", "obsidian", "beacon"] {
            registry.add(name).into_outcome();
        }
        assert_eq!(
            registry.list(),
            vec![kind("beacon"), kind("bedrock"), kind("obsidian"), kind("tnt")]
        );
    }

    #[test]
    fn test_reload_matches_memory_after_each_mutation() {
        let dir = tempdir().unwrap();
        let registry = registry(dir.path());
        let catalog = MaterialCatalog::builtin();

        let assert_in_sync = |persisted: bool| {
            assert!(persisted);
            let reloaded = registry.store().load(catalog).protected;
            assert_eq!(reloaded.into_iter().collect::<Vec<_>>(), registry.list());
        };

        assert_in_sync(registry.add("bedrock").persisted());
        assert_in_sync(registry.add("obsidian").persisted());
        assert_in_sync(registry.remove("bedrock").persisted());
        assert_eq!(registry.list(), vec![kind("obsidian")]);
    }

    #[test]
    fn test_noop_mutations_do_not_write() {
        let dir = tempdir().unwrap();
        let registry = registry(dir.path());
        registry.add("bedrock").into_outcome();
        std::fs::remove_file(registry.store().path()).unwrap();

        let again = registry.add("bedrock");
        assert!(again.persisted());
        assert!(!registry.store().path().exists());
    }

    #[test]
    fn test_persistence_failure_keeps_memory_authoritative() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let registry = ProtectionRegistry::with_protected(
            ConfigStore::new(blocker.join("protected_blocks.json")),
            Arc::new(MaterialCatalog::builtin().clone()),
            ProtectedSet::new(),
        );

        let mutation = registry.add("bedrock");
        assert!(!mutation.persisted());
        assert_eq!(mutation.outcome, AddOutcome::Added(kind("bedrock")));
        assert!(registry.is_protected(&kind("bedrock")));
    }

    #[test]
    fn test_concurrent_mutations_keep_document_in_sync() {
        let dir = tempdir().unwrap();
        let registry = Arc::new(registry(dir.path()));
        let names = ["bedrock", "obsidian", "beacon", "tnt", "stone", "dirt", "glass", "sand"];

        let workers: Vec<_> = (0..4)
            .map(|worker| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for round in 0..25 {
                        let name = names[(worker + round) % names.len()];
                        if (worker + round) % 3 == 0 {
                            assert!(registry.remove(name).persisted());
                        } else {
                            assert!(registry.add(name).persisted());
                        }
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let reloaded = registry.store().load(MaterialCatalog::builtin());
        assert!(reloaded.is_clean());
        assert_eq!(reloaded.protected.into_iter().collect::<Vec<_>>(), registry.list());
    }

    #[test]
    fn test_open_picks_up_existing_document() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("protected_blocks.json"),
            r#"{"protected_blocks": ["bedrock", "unobtainium"]}"#,
        )
        .unwrap();

        let registry = registry(dir.path());
        assert_eq!(registry.list(), vec![kind("bedrock")]);
    }
}
