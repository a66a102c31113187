//! Test exporter lifecycle management
//!
//! Spawns the real metrics server on its own registry, with one session
//! snapshot per upstream family already registered.

#![allow(dead_code)]

use super::constants::*;
use super::fake_upstream::FakeUpstream;
use media_sessions_exporter::jellyfin::JellyfinClient;
use media_sessions_exporter::plex::PlexClient;
use media_sessions_exporter::server::{metrics::register_sessions, serve};
use media_sessions_exporter::upstream::http_client;
use media_sessions_exporter::{SessionPoller, SessionSnapshot, UpstreamFamily};
use prometheus::Registry;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Metrics server with isolated registry and snapshots
///
/// When dropped, the server gracefully shuts down.
pub struct TestExporter {
    /// Base URL for scraping (e.g., "http://127.0.0.1:12345")
    pub base_url: String,
    pub jellyfin_snapshot: Arc<SessionSnapshot>,
    pub plex_snapshot: Arc<SessionSnapshot>,
    shutdown: CancellationToken,
}

impl TestExporter {
    /// Spawns a metrics server on a random port and waits until it answers.
    pub async fn spawn() -> Self {
        let registry = Registry::new();
        let jellyfin_snapshot = Arc::new(SessionSnapshot::new());
        let plex_snapshot = Arc::new(SessionSnapshot::new());
        register_sessions(&registry, UpstreamFamily::Jellyfin, jellyfin_snapshot.clone())
            .expect("Failed to register Jellyfin sessions");
        register_sessions(&registry, UpstreamFamily::Plex, plex_snapshot.clone())
            .expect("Failed to register Plex sessions");

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let shutdown = CancellationToken::new();
        let server_shutdown = shutdown.clone();
        tokio::spawn(async move {
            serve(listener, registry, server_shutdown)
                .await
                .expect("Metrics server failed");
        });

        let exporter = Self {
            base_url: format!("http://127.0.0.1:{}", port),
            jellyfin_snapshot,
            plex_snapshot,
            shutdown,
        };
        exporter.wait_for_ready().await;
        exporter
    }

    /// Waits for the server to become ready by polling /health
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);
        let url = format!("{}/health", self.base_url);

        while start.elapsed() < timeout {
            if let Ok(response) = client.get(&url).send().await {
                if response.status().is_success() {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
        }

        panic!("Metrics server did not become ready within {:?}", timeout);
    }

    /// A poller feeding the Jellyfin snapshot from `upstream`.
    pub fn jellyfin_poller(&self, upstream: &FakeUpstream) -> SessionPoller {
        let client = JellyfinClient::new(client(), &upstream.base_url, JELLYFIN_API_KEY);
        SessionPoller::new(
            Arc::new(client),
            self.jellyfin_snapshot.clone(),
            Duration::from_millis(20),
        )
    }

    /// A poller feeding the Plex snapshot from `upstream`.
    pub fn plex_poller(&self, upstream: &FakeUpstream) -> SessionPoller {
        let client = PlexClient::new(client(), &upstream.base_url, PLEX_TOKEN);
        SessionPoller::new(
            Arc::new(client),
            self.plex_snapshot.clone(),
            Duration::from_millis(20),
        )
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::get(format!("{}{}", self.base_url, path))
            .await
            .expect("Request to metrics server failed")
    }

    /// Body of `GET /metrics`.
    pub async fn scrape(&self) -> String {
        let response = self.get("/metrics").await;
        assert!(response.status().is_success());
        response.text().await.expect("Failed to read metrics body")
    }
}

impl Drop for TestExporter {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn client() -> reqwest::Client {
    http_client().expect("Failed to build upstream client")
}

/// Sample lines of metric `name` in a scrape body.
pub fn series_for<'a>(scrape: &'a str, name: &str) -> Vec<&'a str> {
    let prefix = format!("{}{{", name);
    scrape
        .lines()
        .filter(|line| line.starts_with(&prefix))
        .collect()
}
