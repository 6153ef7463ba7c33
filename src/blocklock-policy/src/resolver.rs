//! Authorization resolution from explicit grants and the privilege list.

use std::fmt;
use std::sync::Arc;

use crate::config::PolicyConfig;
use crate::principal::{Capabilities, Principal, PrincipalId};
use crate::privilege::PrivilegeTable;

/// Minimum privilege level that grants a bypass when no flag does.
pub const DEFAULT_BYPASS_THRESHOLD: i64 = 3;

/// One link in the authorization chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationCheck {
    /// Principal holds the explicit bypass flag.
    ExplicitBypass,
    /// Principal holds the explicit admin flag.
    ExplicitAdmin,
    /// Principal is listed at or above the threshold.
    PrivilegeLevel,
}

impl AuthorizationCheck {
    /// Evaluation order. Explicit grants always come before the table.
    pub const CHAIN: [AuthorizationCheck; 3] = [
        AuthorizationCheck::ExplicitBypass,
        AuthorizationCheck::ExplicitAdmin,
        AuthorizationCheck::PrivilegeLevel,
    ];

    fn passes(self, principal: &Principal, table: &PrivilegeTable, threshold: i64) -> bool {
        match self {
            AuthorizationCheck::ExplicitBypass => principal.has(Capabilities::BYPASS),
            AuthorizationCheck::ExplicitAdmin => principal.has(Capabilities::ADMIN),
            AuthorizationCheck::PrivilegeLevel => table
                .level(&principal.id)
                .is_some_and(|level| level >= threshold),
        }
    }
}

impl fmt::Display for AuthorizationCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExplicitBypass => write!(f, "bypass flag"),
            Self::ExplicitAdmin => write!(f, "admin flag"),
            Self::PrivilegeLevel => write!(f, "privilege level"),
        }
    }
}

/// Decides whether a principal may mutate or bypass protection.
///
/// Never mutates the privilege table it reads from.
#[derive(Debug, Clone)]
pub struct AuthorizationResolver {
    table: Arc<PrivilegeTable>,
    threshold: i64,
}

impl AuthorizationResolver {
    /// Resolver over `table` with the default threshold.
    pub fn new(table: Arc<PrivilegeTable>) -> Self {
        Self {
            table,
            threshold: DEFAULT_BYPASS_THRESHOLD,
        }
    }

    /// Resolver over `table` with a configured threshold.
    pub fn with_config(table: Arc<PrivilegeTable>, config: &PolicyConfig) -> Self {
        Self {
            table,
            threshold: config.bypass_threshold,
        }
    }

    /// The level at which the table grants a bypass.
    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    /// The privilege snapshot in use.
    pub fn privileges(&self) -> &PrivilegeTable {
        &self.table
    }

    /// Level of a principal in the table, if listed.
    pub fn level_of(&self, id: &PrincipalId) -> Option<i64> {
        self.table.level(id)
    }

    /// The first check in [`AuthorizationCheck::CHAIN`] that grants access.
    pub fn resolve(&self, principal: &Principal) -> Option<AuthorizationCheck> {
        AuthorizationCheck::CHAIN
            .into_iter()
            .find(|check| check.passes(principal, &self.table, self.threshold))
    }

    /// Whether the principal may bypass protection.
    pub fn may_bypass(&self, principal: &Principal) -> bool {
        self.resolve(principal).is_some()
    }
}

impl Default for AuthorizationResolver {
    fn default() -> Self {
        Self::new(Arc::new(PrivilegeTable::new()))
    }
}
