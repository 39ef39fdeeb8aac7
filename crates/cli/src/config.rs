//! Application configuration.
//!
//! Read from an optional JSON file. Every field has a default, so an empty
//! object (or no file at all) is a valid configuration.

use anyhow::{Context, Result};
use encoder::EncoderConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Recommendations per query when `-k` is not given
    #[serde(default = "default_k")]
    pub default_k: usize,

    /// Tokenization, weighting and scaling of features
    #[serde(default)]
    pub encoder: EncoderConfig,
}

fn default_k() -> usize {
    service::DEFAULT_K
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_k: default_k(),
            encoder: EncoderConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(content)?;
        anyhow::ensure!(config.default_k > 0, "default_k must be at least 1");
        Ok(config)
    }
}
