mod file_config;

pub use file_config::{FileConfig, UpstreamFileConfig};

use crate::sessions::UpstreamFamily;
use crate::upstream::normalize_address;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_POLL_INTERVAL_SEC: u64 = 30;
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0";

/// Invalid startup configuration. Always fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{family} {missing} must be provided together with its {other}")]
    Incomplete {
        family: UpstreamFamily,
        missing: &'static str,
        other: &'static str,
    },

    #[error("No upstream configured: provide a Jellyfin address and API key, a Plex address and token, or both")]
    NoUpstream,

    #[error("{family} poll interval must be greater than zero")]
    ZeroPollInterval { family: UpstreamFamily },
}

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub jellyfin_address: Option<String>,
    pub jellyfin_api_key: Option<String>,
    pub plex_address: Option<String>,
    pub plex_token: Option<String>,
    pub poll_interval_sec: u64,
    pub listen_address: String,
    pub port: u16,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            jellyfin_address: None,
            jellyfin_api_key: None,
            plex_address: None,
            plex_token: None,
            poll_interval_sec: DEFAULT_POLL_INTERVAL_SEC,
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_address: String,
    pub port: u16,

    // An upstream is polled iff it is present here
    pub jellyfin: Option<UpstreamSettings>,
    pub plex: Option<UpstreamSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamSettings {
    pub address: String,
    pub credential: String,
    pub poll_interval: Duration,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self, ConfigError> {
        let file = file_config.unwrap_or_default();

        let listen_address = file
            .listen_address
            .unwrap_or_else(|| cli.listen_address.clone());
        let port = file.port.unwrap_or(cli.port);
        let poll_interval_sec = file.poll_interval_sec.unwrap_or(cli.poll_interval_sec);

        let jellyfin = resolve_upstream(
            UpstreamFamily::Jellyfin,
            file.jellyfin.unwrap_or_default(),
            cli.jellyfin_address.as_deref(),
            cli.jellyfin_api_key.as_deref(),
            poll_interval_sec,
        )?;
        let plex = resolve_upstream(
            UpstreamFamily::Plex,
            file.plex.unwrap_or_default(),
            cli.plex_address.as_deref(),
            cli.plex_token.as_deref(),
            poll_interval_sec,
        )?;

        if jellyfin.is_none() && plex.is_none() {
            return Err(ConfigError::NoUpstream);
        }

        Ok(Self {
            listen_address,
            port,
            jellyfin,
            plex,
        })
    }

    /// Enabled upstreams with their settings.
    pub fn upstreams(&self) -> Vec<(UpstreamFamily, &UpstreamSettings)> {
        [
            (UpstreamFamily::Jellyfin, self.jellyfin.as_ref()),
            (UpstreamFamily::Plex, self.plex.as_ref()),
        ]
        .into_iter()
        .filter_map(|(family, settings)| settings.map(|s| (family, s)))
        .collect()
    }
}

/// Merges one upstream's settings. `Ok(None)` means the upstream is disabled.
fn resolve_upstream(
    family: UpstreamFamily,
    file: UpstreamFileConfig,
    cli_address: Option<&str>,
    cli_credential: Option<&str>,
    default_interval_sec: u64,
) -> Result<Option<UpstreamSettings>, ConfigError> {
    let address = non_empty(file.address.as_deref()).or(non_empty(cli_address));
    let credential = non_empty(file.api_key.as_deref()).or(non_empty(cli_credential));
    let credential_name = match family {
        UpstreamFamily::Jellyfin => "API key",
        UpstreamFamily::Plex => "token",
    };

    let (address, credential) = match (address, credential) {
        (Some(address), Some(credential)) => (address, credential),
        (None, None) => return Ok(None),
        (Some(_), None) => {
            return Err(ConfigError::Incomplete {
                family,
                missing: credential_name,
                other: "address",
            })
        }
        (None, Some(_)) => {
            return Err(ConfigError::Incomplete {
                family,
                missing: "address",
                other: credential_name,
            })
        }
    };

    let interval_sec = file.poll_interval_sec.unwrap_or(default_interval_sec);
    if interval_sec == 0 {
        return Err(ConfigError::ZeroPollInterval { family });
    }

    Ok(Some(UpstreamSettings {
        address: normalize_address(address),
        credential: credential.to_string(),
        poll_interval: Duration::from_secs(interval_sec),
    }))
}

/// Empty values (e.g. `JELLYFIN_ADDRESS=`) count as unset.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
