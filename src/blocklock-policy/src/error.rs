//! Error types for the policy crate.

use thiserror::Error;

/// Errors that can occur while resolving names and identities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// Name is not a syntactically valid resource identifier
    #[error("invalid resource identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Name is well formed but unknown to the catalog
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    /// Principal id could not be parsed
    #[error("invalid principal id {id:?}: {reason}")]
    InvalidPrincipalId { id: String, reason: String },
}
