//! Policy configuration.

use serde::{Deserialize, Serialize};

use crate::resolver::DEFAULT_BYPASS_THRESHOLD;

/// Configuration for the authorization resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Privilege level at or above which a listed principal bypasses protection.
    #[serde(default = "default_bypass_threshold")]
    pub bypass_threshold: i64,
}

fn default_bypass_threshold() -> i64 {
    DEFAULT_BYPASS_THRESHOLD
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            bypass_threshold: DEFAULT_BYPASS_THRESHOLD,
        }
    }
}
