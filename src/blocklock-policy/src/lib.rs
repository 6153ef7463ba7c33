#![allow(clippy::missing_errors_doc, clippy::doc_markdown)]
//! Blocklock Policy - resource catalog, principals and protection decisions.
//!
//! This crate decides what happens to an intercepted world mutation:
//! - `Allow` - The mutation proceeds unmodified
//! - `Deny` - The mutation is vetoed
//! - `FilterPartial` - The instance is dropped from its batch, the rest proceeds
//!
//! Nothing here touches the filesystem or the host event system, so every
//! decision can be unit-tested without a running host.
//!
//! # Decision Flow
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │        (ResourceKind, Option<Principal>)   │
//! └────────────────────┬───────────────────────┘
//!                      │
//!                      ▼
//! ┌────────────────────────────────────────────┐
//! │          Is the kind protected?            │
//! └────────────────────┬───────────────────────┘
//!                      │
//!        ┌─────────────┴─────────────┐
//!        ▼                           ▼
//!      [No]                        [Yes]
//!        │                           │
//!        ▼                           ▼
//!   ┌─────────┐              ┌─────────────────┐
//!   │  ALLOW  │              │ Attributable    │
//!   └─────────┘              │ actor present?  │
//!                            └────────┬────────┘
//!                                     │
//!                       ┌─────────────┴─────────────┐
//!                       ▼                           ▼
//!                     [No]                        [Yes]
//!                       │                           │
//!                       ▼                           ▼
//!                 ┌──────────┐            ┌──────────────────┐
//!                 │  FILTER  │            │ bypass → admin → │
//!                 └──────────┘            │ privilege level  │
//!                                         └────────┬─────────┘
//!                                                  │
//!                                    ┌─────────────┴─────────────┐
//!                                    ▼                           ▼
//!                               [granted]                    [refused]
//!                                    │                           │
//!                                    ▼                           ▼
//!                               ┌─────────┐                 ┌─────────┐
//!                               │  ALLOW  │                 │  DENY   │
//!                               └─────────┘                 └─────────┘
//! ```


mod catalog;
mod config;
mod decision;
mod error;
mod policy;
mod principal;
mod privilege;
mod resolver;

// Re-export all public types
pub use catalog::{MaterialCatalog, MaterialClass, ResourceCatalog, ResourceKind};
pub use config::PolicyConfig;
pub use decision::Decision;
pub use error::PolicyError;
pub use policy::{EnforcementPolicy, ProtectionLookup};
pub use principal::{Capabilities, Principal, PrincipalId};
pub use privilege::PrivilegeTable;
pub use resolver::{AuthorizationCheck, AuthorizationResolver, DEFAULT_BYPASS_THRESHOLD};

/// Result type for policy operations.
pub type Result<T> = std::result::Result<T, PolicyError>;

// ============================================================================
// Convenience Functions
// ============================================================================

/// Quick evaluation against an empty privilege table.
///
/// Only explicit capability flags can grant a bypass here. Privilege levels
/// need a loaded table; build an [`EnforcementPolicy`] over one for that.
pub fn evaluate(
    lookup: &(impl ProtectionLookup + ?Sized),
    kind: &ResourceKind,
    actor: Option<&Principal>,
) -> Decision {
    EnforcementPolicy::default().evaluate(lookup, kind, actor)
}

/// Resolve a resource name against the builtin material catalog.
pub fn resolve_material(name: &str) -> Result<ResourceKind> {
    MaterialCatalog::builtin().lookup(name)
}
