//! Workspace engine configuration
//!
//! Tunables for the managers, loadable from a host-supplied JSON blob.
//! Every field has a default matching the engine's documented behaviour.

use serde::{Deserialize, Serialize};

/// Engine configuration that hosts may override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Maximum retained history snapshots per drawing panel
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Lower clamp bound for split fractions
    #[serde(default = "default_min_split")]
    pub min_split_size: f64,

    /// Upper clamp bound for split fractions
    #[serde(default = "default_max_split")]
    pub max_split_size: f64,

    /// Content key used when a panel is created without one
    #[serde(default = "default_content_key")]
    pub default_content_key: String,

    /// Base display name for untitled panels
    #[serde(default = "default_panel_name")]
    pub panel_name: String,
}

fn default_history_limit() -> usize {
    crate::history::DEFAULT_HISTORY_LIMIT
}

fn default_min_split() -> f64 {
    0.1
}

fn default_max_split() -> f64 {
    0.9
}

fn default_content_key() -> String {
    "drawing".to_string()
}

fn default_panel_name() -> String {
    "Panel".to_string()
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            min_split_size: default_min_split(),
            max_split_size: default_max_split(),
            default_content_key: default_content_key(),
            panel_name: default_panel_name(),
        }
    }
}

impl WorkspaceConfig {
    /// Parse a configuration blob, falling back to defaults for missing
    /// fields
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Clamp a split fraction into the configured range
    pub fn clamp_split(&self, size: f64) -> f64 {
        size.clamp(self.min_split_size, self.max_split_size)
    }
}
