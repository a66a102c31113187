use anyhow::{Context, Result};
use axum::{routing::get, Router};
use prometheus::Registry;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::metrics::metrics_handler;

const HOME_PAGE: &str = "Media sessions exporter\n\nMetrics are served at /metrics\n";

async fn home() -> &'static str {
    HOME_PAGE
}

async fn health() -> &'static str {
    "OK"
}

/// Builds the scrape router. Everything it serves comes from `registry`.
pub fn make_app(registry: Registry) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .with_state(registry)
}

/// Serves the scrape endpoint on an already bound listener until `shutdown` fires.
pub async fn serve(
    listener: tokio::net::TcpListener,
    registry: Registry,
    shutdown: CancellationToken,
) -> Result<()> {
    let app = make_app(registry);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("Metrics server failed")
}

pub async fn run_server(
    listen_address: &str,
    port: u16,
    registry: Registry,
    shutdown: CancellationToken,
) -> Result<()> {
    let listener = tokio::net::TcpListener::bind((listen_address, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", listen_address, port))?;
    info!("Metrics available at http://{}:{}/metrics", listen_address, port);

    serve(listener, registry, shutdown).await
}
