//! Acting principals and their externally granted capabilities.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PolicyError;

/// Stable identity of an actor, as recorded in the privilege list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(Uuid);

impl PrincipalId {
    /// Wrap an existing UUID.
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// A fresh random id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse the hyphenated or simple UUID form.
    pub fn parse(raw: &str) -> Result<Self, PolicyError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|e| PolicyError::InvalidPrincipalId {
                id: raw.to_string(),
                reason: e.to_string(),
            })
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for PrincipalId {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

bitflags! {
    /// Capability flags granted to a principal by the host's permission system.
    ///
    /// | Flag | Meaning |
    /// |------|---------|
    /// | [`BYPASS`](Self::BYPASS) | Ignore protection regardless of privilege level |
    /// | [`ADMIN`](Self::ADMIN) | Administer the protected set |
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        /// `blocklock.bypass`
        const BYPASS = 0b0000_0001;
        /// `blocklock.admin`
        const ADMIN  = 0b0000_0010;
    }
}

/// An actor capable of triggering events and issuing commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Stable identity.
    pub id: PrincipalId,

    /// Display name, used only for messages and logs.
    pub name: Option<String>,

    /// Explicit grants.
    pub capabilities: Capabilities,
}

impl Principal {
    /// A principal with no name and no capabilities.
    pub fn new(id: PrincipalId) -> Self {
        Self {
            id,
            name: None,
            capabilities: Capabilities::empty(),
        }
    }

    /// Builder: set display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder: grant capabilities.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities |= capabilities;
        self
    }

    /// Whether every flag in `capabilities` has been granted.
    pub fn has(&self, capabilities: Capabilities) -> bool {
        self.capabilities.contains(capabilities)
    }

    /// Name if known, id otherwise.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.id.to_string(),
        }
    }
}
