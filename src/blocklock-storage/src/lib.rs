//! Blocklock Storage - persistence for the protected set and the privilege list.
//!
//! Two documents live on disk:
//!
//! - **`protected_blocks.json`** - owned by Blocklock, fully rewritten on
//!   every mutation: `{"protected_blocks": ["bedrock", "obsidian"]}`
//! - **`ops.json`** - owned by the host, read once at startup:
//!   `[{"uuid": "...", "name": "...", "level": 4}]`
//!
//! Both loaders fail soft. A missing document is an empty set or table, a
//! corrupt one is reported and replaced by the empty default, and a single
//! bad entry never spoils the rest.
//!
//! # Usage
//!
//! ```rust,no_run
//! use blocklock_policy::MaterialCatalog;
//! use blocklock_storage::{BlocklockPaths, ConfigStore, PrivilegeSource, default_data_dir};
//!
//! fn main() -> blocklock_storage::Result<()> {
//!     let paths = BlocklockPaths::from_root(default_data_dir()?);
//!     let store = ConfigStore::new(paths.protected_blocks_file.clone());
//!
//!     let loaded = store.load(MaterialCatalog::builtin());
//!     println!("{} protected kinds", loaded.protected.len());
//!
//!     let privileges = PrivilegeSource::new(paths.privilege_file.clone()).load();
//!     println!("{} privileged principals", privileges.len());
//!
//!     store.save(&loaded.protected)
//! }
//! ```

mod atomic;
pub mod config_store;
pub mod error;
pub mod paths;
pub mod privilege_source;


// Re-export main types at crate root
pub use config_store::{ConfigLoad, ConfigStore, ProtectedSet};
pub use error::{Result, StorageError};
pub use paths::{BlocklockPaths, default_data_dir};
pub use privilege_source::PrivilegeSource;
