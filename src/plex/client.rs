//! HTTP client for the Plex sessions API.

use async_trait::async_trait;
use tracing::debug;

use super::models::PlexSessions;
use super::normalize::normalize_sessions;
use crate::sessions::{SessionRecord, UpstreamFamily};
use crate::upstream::{fetch_body, normalize_address, SessionSource, UpstreamError};

/// Polls `GET <address>/status/sessions?X-Plex-Token=<token>`.
pub struct PlexClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl PlexClient {
    /// Create a new Plex client.
    ///
    /// # Arguments
    /// * `client` - Shared HTTP client
    /// * `base_url` - Base URL of the Plex server (e.g., "http://localhost:32400")
    /// * `token` - `X-Plex-Token` of an account allowed to see all sessions
    pub fn new(client: reqwest::Client, base_url: &str, token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: normalize_address(base_url),
            token: token.into(),
        }
    }

    /// Fetch the raw session list.
    pub async fn get_sessions(&self) -> Result<PlexSessions, UpstreamError> {
        let body = fetch_body(
            &self.client,
            UpstreamFamily::Plex,
            &self.base_url,
            "/status/sessions",
            ("X-Plex-Token", self.token.as_str()),
        )
        .await?;

        let sessions = PlexSessions::from_xml(&body).map_err(|e| UpstreamError::Decode {
            family: UpstreamFamily::Plex,
            message: e.to_string(),
        })?;
        debug!(
            "Plex sessions scraped successfully ({} video entries)",
            sessions.videos.len()
        );
        Ok(sessions)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SessionSource for PlexClient {
    fn family(&self) -> UpstreamFamily {
        UpstreamFamily::Plex
    }

    fn address(&self) -> &str {
        &self.base_url
    }

    async fn fetch_sessions(&self) -> Result<Vec<SessionRecord>, UpstreamError> {
        let sessions = self.get_sessions().await?;
        Ok(normalize_sessions(&sessions))
    }
}
