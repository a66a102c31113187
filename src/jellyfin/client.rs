//! HTTP client for the Jellyfin sessions API.

use async_trait::async_trait;
use tracing::debug;

use super::models::JellyfinSession;
use super::normalize::normalize_sessions;
use crate::sessions::{SessionRecord, UpstreamFamily};
use crate::upstream::{fetch_body, normalize_address, SessionSource, UpstreamError};

/// Polls `GET <address>/Sessions?api_key=<key>`.
pub struct JellyfinClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl JellyfinClient {
    /// Create a new Jellyfin client.
    ///
    /// # Arguments
    /// * `client` - Shared HTTP client
    /// * `base_url` - Base URL of the Jellyfin server (e.g., "http://localhost:8096")
    /// * `api_key` - API key created in the Jellyfin dashboard
    pub fn new(client: reqwest::Client, base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: normalize_address(base_url),
            api_key: api_key.into(),
        }
    }

    /// Fetch the raw session list.
    pub async fn get_sessions(&self) -> Result<Vec<JellyfinSession>, UpstreamError> {
        let body = fetch_body(
            &self.client,
            UpstreamFamily::Jellyfin,
            &self.base_url,
            "/Sessions",
            ("api_key", self.api_key.as_str()),
        )
        .await?;

        let sessions: Vec<JellyfinSession> =
            serde_json::from_str(&body).map_err(|e| UpstreamError::Decode {
                family: UpstreamFamily::Jellyfin,
                message: e.to_string(),
            })?;
        debug!("Jellyfin sessions scraped successfully ({} entries)", sessions.len());
        Ok(sessions)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SessionSource for JellyfinClient {
    fn family(&self) -> UpstreamFamily {
        UpstreamFamily::Jellyfin
    }

    fn address(&self) -> &str {
        &self.base_url
    }

    async fn fetch_sessions(&self) -> Result<Vec<SessionRecord>, UpstreamError> {
        let sessions = self.get_sessions().await?;
        Ok(normalize_sessions(&sessions))
    }
}
