use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::DeployError;

/// Configuration for the deployment tool, loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// RPC URL of the ledger node.
    #[serde(default = "default_node_url")]
    pub node_url: String,
    /// Path to the approval program artifact.
    #[serde(default = "default_approval_path")]
    pub approval_path: String,
    /// Path to the clear-state program artifact.
    #[serde(default = "default_clear_path")]
    pub clear_path: String,
    /// File holding the operator's mnemonic phrase. Prompted interactively
    /// when unset.
    #[serde(default)]
    pub mnemonic_path: Option<String>,
}

fn default_node_url() -> String {
    "http://127.0.0.1:9741".to_string()
}

fn default_approval_path() -> String {
    "approval.hbp".to_string()
}

fn default_clear_path() -> String {
    "clear.hbp".to_string()
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            node_url: default_node_url(),
            approval_path: default_approval_path(),
            clear_path: default_clear_path(),
            mnemonic_path: None,
        }
    }
}

impl DeployConfig {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load_or_default(path: &str) -> Result<Self, DeployError> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| DeployError::Config {
            reason: format!("failed to read config file '{}': {}", path, e),
        })?;
        toml::from_str(&contents).map_err(|e| DeployError::Config {
            reason: format!("failed to parse config file '{}': {}", path, e),
        })
    }

    /// Write the configuration to a TOML file.
    pub fn save(&self, path: &str) -> Result<(), DeployError> {
        let contents = toml::to_string_pretty(self).map_err(|e| DeployError::Config {
            reason: format!("failed to serialize config: {}", e),
        })?;
        std::fs::write(path, contents).map_err(|e| DeployError::Config {
            reason: format!("failed to write config file '{}': {}", path, e),
        })
    }
}
