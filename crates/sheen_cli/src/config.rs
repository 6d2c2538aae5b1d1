//! Sheen configuration file handling

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sheen_style::EngineConfig;
use std::fs;
use std::path::Path;

/// Default config file looked up in the working directory
pub const CONFIG_FILE: &str = "sheen.toml";

/// Top-level configuration (sheen.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SheenConfig {
    #[serde(default)]
    pub engine: EngineConfig,
}

impl SheenConfig {
    /// Load an explicit config file, or `sheen.toml` from the working
    /// directory when present, or the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file {} does not exist", path.display());
                }
                Self::load_file(path)
            }
            None => {
                let local = Path::new(CONFIG_FILE);
                if local.is_file() {
                    Self::load_file(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
