//! Host-independent protection decision.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::catalog::ResourceKind;
use crate::decision::Decision;
use crate::principal::Principal;
use crate::resolver::AuthorizationResolver;

/// Anything that can answer "is this kind protected?".
pub trait ProtectionLookup {
    /// Pure query, no side effects.
    fn is_protected(&self, kind: &ResourceKind) -> bool;
}

impl ProtectionLookup for BTreeSet<ResourceKind> {
    fn is_protected(&self, kind: &ResourceKind) -> bool {
        self.contains(kind)
    }
}

impl ProtectionLookup for HashSet<ResourceKind> {
    fn is_protected(&self, kind: &ResourceKind) -> bool {
        self.contains(kind)
    }
}

/// Maps `(kind, actor)` to a [`Decision`].
#[derive(Debug, Clone, Default)]
pub struct EnforcementPolicy {
    resolver: AuthorizationResolver,
}

impl EnforcementPolicy {
    /// Policy backed by the given resolver.
    pub fn new(resolver: AuthorizationResolver) -> Self {
        Self { resolver }
    }

    /// Returns a reference to the resolver.
    pub fn resolver(&self) -> &AuthorizationResolver {
        &self.resolver
    }

    /// Decide the fate of one resource instance.
    ///
    /// `actor` is `None` for bulk removals, which have nobody to authorize;
    /// protected instances are then filtered instead of vetoing the batch.
    pub fn evaluate(
        &self,
        lookup: &(impl ProtectionLookup + ?Sized),
        kind: &ResourceKind,
        actor: Option<&Principal>,
    ) -> Decision {
        if !lookup.is_protected(kind) {
            return Decision::Allow;
        }

        let Some(actor) = actor else {
            return Decision::FilterPartial;
        };

        match self.resolver.resolve(actor) {
            Some(check) => {
                debug!(kind = %kind, principal = %actor.id, granted_by = %check, "Protection bypassed");
                Decision::Allow
            }
            None => Decision::Deny,
        }
    }
}
