//! `[activate]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [activate]
//! strategy = "symlink"      # "symlink" or "copy"
//! lock_timeout_ms = 10000   # Wait for a concurrent activation
//! ```
//!
//! Use `strategy = "copy"` where symbolic links cannot be created.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How root entries point at the active site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Symlink,
    Copy,
}

/// Activation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivateConfig {
    pub strategy: StrategyKind,
    pub lock_timeout_ms: u64,
}

impl Default for ActivateConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Symlink,
            lock_timeout_ms: 10_000,
        }
    }
}

impl ActivateConfig {
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}
