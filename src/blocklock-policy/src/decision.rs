//! Enforcement decision types.

use serde::{Deserialize, Serialize};

/// Enforcement decision for one resource instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// The mutation proceeds unmodified.
    Allow,
    /// The whole mutation is vetoed.
    Deny,
    /// This instance is dropped from its batch; the rest proceeds.
    FilterPartial,
}

impl Decision {
    /// Returns true if the instance survives the mutation untouched by policy.
    pub fn allows(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Returns true if the event must be cancelled.
    pub fn is_blocked(&self) -> bool {
        matches!(self, Decision::Deny)
    }

    /// Returns true if the instance must be removed from its batch.
    pub fn filters(&self) -> bool {
        matches!(self, Decision::FilterPartial)
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Allow => write!(f, "ALLOW"),
            Decision::Deny => write!(f, "DENY"),
            Decision::FilterPartial => write!(f, "FILTER"),
        }
    }
}
