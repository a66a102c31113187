//! Fake Jellyfin and Plex servers
//!
//! Each fake answers its sessions endpoint with whatever status and body the
//! test configured last, and records the query string of every request.

#![allow(dead_code)]

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone)]
struct CannedResponse {
    status: StatusCode,
    content_type: &'static str,
    body: String,
    delay: Duration,
}

#[derive(Clone)]
struct FakeState {
    response: Arc<Mutex<CannedResponse>>,
    queries: Arc<Mutex<Vec<String>>>,
}

async fn respond(State(state): State<FakeState>, uri: Uri) -> impl IntoResponse {
    state
        .queries
        .lock()
        .unwrap()
        .push(uri.query().unwrap_or_default().to_string());

    let canned = state.response.lock().unwrap().clone();
    if !canned.delay.is_zero() {
        tokio::time::sleep(canned.delay).await;
    }
    (
        canned.status,
        [(header::CONTENT_TYPE, canned.content_type)],
        canned.body,
    )
}

/// A fake media server bound to a random local port.
///
/// When dropped, the server shuts down.
pub struct FakeUpstream {
    /// Base URL for clients (e.g., "http://127.0.0.1:12345")
    pub base_url: String,
    state: FakeState,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl FakeUpstream {
    /// Fake Jellyfin answering `GET /Sessions` with `body`.
    pub async fn jellyfin(body: &str) -> Self {
        Self::spawn("/Sessions", "application/json", body).await
    }

    /// Fake Plex answering `GET /status/sessions` with `body`.
    pub async fn plex(body: &str) -> Self {
        Self::spawn("/status/sessions", "text/xml;charset=utf-8", body).await
    }

    async fn spawn(path: &str, content_type: &'static str, body: &str) -> Self {
        let state = FakeState {
            response: Arc::new(Mutex::new(CannedResponse {
                status: StatusCode::OK,
                content_type,
                body: body.to_string(),
                delay: Duration::ZERO,
            })),
            queries: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route(path, get(respond))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Fake upstream failed");
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Serve `body` with a 200 from now on.
    pub fn set_body(&self, body: &str) {
        self.respond_with(StatusCode::OK, body);
    }

    pub fn respond_with(&self, status: StatusCode, body: &str) {
        let mut response = self.state.response.lock().unwrap();
        response.status = status;
        response.body = body.to_string();
    }

    /// Hold every response for `delay` before sending it.
    pub fn set_delay(&self, delay: Duration) {
        self.state.response.lock().unwrap().delay = delay;
    }

    /// Query strings of all requests received so far, oldest first.
    pub fn queries(&self) -> Vec<String> {
        self.state.queries.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.queries.lock().unwrap().len()
    }
}

impl Drop for FakeUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
