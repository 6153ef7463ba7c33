//! Blocklock registry - the protected set, the hooks that enforce it, and the
//! admin commands that change it.
//!
//! One [`ProtectionRegistry`] is shared by handle between the
//! [`CommandDispatcher`] and the [`EnforcementHook`]. Mutations are
//! serialized by a single lock and written through to disk before the lock
//! is released.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use blocklock_policy::{
//!     AuthorizationResolver, EnforcementPolicy, MaterialCatalog, Principal, PrincipalId,
//!     ResourceCatalog,
//! };
//! use blocklock_registry::{
//!     BlockBreakEvent, BlockInstance, BlockPos, CommandDispatcher, CommandSender,
//!     EnforcementHook, ProtectionRegistry,
//! };
//! use blocklock_storage::{BlocklockPaths, ConfigStore, PrivilegeSource, default_data_dir};
//!
//! let paths = BlocklockPaths::from_root(default_data_dir().unwrap());
//! let registry = Arc::new(ProtectionRegistry::open(
//!     ConfigStore::new(paths.protected_blocks_file.clone()),
//!     Arc::new(MaterialCatalog::builtin().clone()),
//! ));
//! let resolver = AuthorizationResolver::new(Arc::new(
//!     PrivilegeSource::new(paths.privilege_file.clone()).load(),
//! ));
//!
//! let commands = CommandDispatcher::new(registry.clone(), resolver.clone());
//! println!("{}", commands.dispatch(&CommandSender::Console, &["set", "bedrock"]));
//!
//! let hook = EnforcementHook::new(
//!     registry,
//!     EnforcementPolicy::new(resolver),
//!     Arc::new(|to: &Principal, msg: &str| println!("-> {}: {msg}", to.display_name())),
//! );
//! let bedrock = MaterialCatalog::builtin().resolve("bedrock").unwrap();
//! let mut event = BlockBreakEvent::new(
//!     BlockInstance::new(bedrock, BlockPos::new(0, 0, 0)),
//!     Principal::new(PrincipalId::random()),
//! );
//! hook.on_block_break(&mut event);
//! assert!(event.is_cancelled());
//! ```

pub mod commands;
pub mod hook;
pub mod registry;
pub mod sink;

pub use commands::{CommandDispatcher, CommandReply, CommandSender};
pub use hook::{
    BlockBreakEvent, BlockInstance, BlockPos, BulkRemovalEvent, DENIAL_NOTICE, EnforcementHook,
};
pub use registry::{AddOutcome, Mutation, ProtectionRegistry, RemoveOutcome};
pub use sink::MessageSink;
