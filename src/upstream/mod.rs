//! Shared plumbing for talking to media servers.

use crate::sessions::{SessionRecord, UpstreamFamily};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::num::ParseIntError;
use thiserror::Error;
use tracing::info;

/// Failure of a single poll against one upstream.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Failed to reach {family} at {address}: {source}")]
    Transport {
        family: UpstreamFamily,
        address: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{family} at {address} responded with status {status}")]
    Status {
        family: UpstreamFamily,
        address: String,
        status: StatusCode,
    },

    #[error("Failed to decode {family} sessions payload: {message}")]
    Decode {
        family: UpstreamFamily,
        message: String,
    },
}

impl UpstreamError {
    /// Value of the `outcome` label on the request counter.
    pub fn outcome(&self) -> &'static str {
        match self {
            UpstreamError::Transport { .. } | UpstreamError::Status { .. } => "transport_error",
            UpstreamError::Decode { .. } => "decode_error",
        }
    }
}

/// A single session field that could not be extracted.
///
/// Never fatal: the normalizer substitutes a marker value and keeps going.
#[derive(Debug, Error)]
pub enum FieldExtractionError {
    #[error("{field} {value:?} is not a number: {source}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

impl FieldExtractionError {
    pub fn field(&self) -> &'static str {
        match self {
            FieldExtractionError::InvalidNumber { field, .. } => field,
        }
    }
}

/// A media server that can be asked for its active playback sessions.
#[async_trait]
pub trait SessionSource: Send + Sync {
    fn family(&self) -> UpstreamFamily;

    /// Base address, for diagnostics.
    fn address(&self) -> &str;

    /// Performs one round trip and returns the normalized active sessions.
    async fn fetch_sessions(&self) -> Result<Vec<SessionRecord>, UpstreamError>;
}

/// Builds the HTTP client used by upstream clients.
///
/// No request timeout is set: a hung upstream only delays its own poller.
pub fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
}

/// Issues `GET <address><path>?<credential>` and returns the body on a 2xx.
pub(crate) async fn fetch_body(
    client: &reqwest::Client,
    family: UpstreamFamily,
    address: &str,
    path: &str,
    credential: (&str, &str),
) -> Result<String, UpstreamError> {
    let url = format!("{}{}", address, path);
    let transport = |source| UpstreamError::Transport {
        family,
        address: address.to_string(),
        source,
    };

    let response = client
        .get(&url)
        .query(&[credential])
        .send()
        .await
        .map_err(transport)?;

    let status = response.status();
    info!(
        "API request to {} at {} completed with status code: {}",
        family,
        address,
        status.as_u16()
    );

    if !status.is_success() {
        return Err(UpstreamError::Status {
            family,
            address: address.to_string(),
            status,
        });
    }

    response.text().await.map_err(transport)
}

/// Strips trailing slashes so paths can be appended verbatim.
pub fn normalize_address(address: &str) -> String {
    address.trim_end_matches('/').to_string()
}
