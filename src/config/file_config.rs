use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub listen_address: Option<String>,
    pub port: Option<u16>,
    pub poll_interval_sec: Option<u64>,

    // Upstreams
    pub jellyfin: Option<UpstreamFileConfig>,
    pub plex: Option<UpstreamFileConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct UpstreamFileConfig {
    pub address: Option<String>,
    /// Jellyfin API key or Plex token.
    #[serde(alias = "token")]
    pub api_key: Option<String>,
    /// Overrides the global poll interval for this upstream only.
    pub poll_interval_sec: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
