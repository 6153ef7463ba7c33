//! Externally administered privilege levels.

use std::collections::HashMap;

use crate::principal::PrincipalId;

/// Snapshot of the privilege list: principal id to numeric level.
///
/// There is no way to insert into a table after it has been built; a new
/// snapshot requires a reload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrivilegeTable {
    levels: HashMap<PrincipalId, i64>,
}

impl PrivilegeTable {
    /// An empty table. Every lookup misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Level for a principal, if listed.
    pub fn level(&self, id: &PrincipalId) -> Option<i64> {
        self.levels.get(id).copied()
    }

    /// Number of listed principals.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether nobody is listed.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Iterate over all entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&PrincipalId, i64)> {
        self.levels.iter().map(|(id, level)| (id, *level))
    }
}

impl From<HashMap<PrincipalId, i64>> for PrivilegeTable {
    fn from(levels: HashMap<PrincipalId, i64>) -> Self {
        Self { levels }
    }
}

impl FromIterator<(PrincipalId, i64)> for PrivilegeTable {
    fn from_iter<T: IntoIterator<Item = (PrincipalId, i64)>>(iter: T) -> Self {
        Self {
            levels: iter.into_iter().collect(),
        }
    }
}
