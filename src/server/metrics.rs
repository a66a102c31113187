use axum::{extract::State, http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::sessions::{SessionSnapshot, SessionsCollector, UpstreamFamily};

/// Metric name prefix for the exporter's own metrics
const PREFIX: &str = "media_sessions_exporter";

lazy_static! {
    // Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // Upstream Metrics
    pub static ref UPSTREAM_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_upstream_requests_total"), "Total session polls by upstream and outcome"),
        &["family", "outcome"]
    ).expect("Failed to create upstream_requests_total metric");

    pub static ref UPSTREAM_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_upstream_request_duration_seconds"),
            "Duration of a session poll in seconds"
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["family"]
    ).expect("Failed to create upstream_request_duration_seconds metric");

    pub static ref FIELD_EXTRACTION_ERRORS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_field_extraction_errors_total"), "Session fields replaced by an error marker"),
        &["family", "field"]
    ).expect("Failed to create field_extraction_errors_total metric");

    pub static ref LAST_SUCCESSFUL_POLL_TIMESTAMP_SECONDS: GaugeVec = GaugeVec::new(
        Opts::new(format!("{PREFIX}_last_successful_poll_timestamp_seconds"), "Unix time of the last successful poll"),
        &["family"]
    ).expect("Failed to create last_successful_poll_timestamp_seconds metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Register all metrics - ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(UPSTREAM_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(UPSTREAM_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(FIELD_EXTRACTION_ERRORS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(LAST_SUCCESSFUL_POLL_TIMESTAMP_SECONDS.clone()));

    tracing::info!("Metrics system initialized successfully");
}

/// Expose `snapshot` in `registry` under the gauge family of `family`.
pub fn register_sessions(
    registry: &Registry,
    family: UpstreamFamily,
    snapshot: Arc<SessionSnapshot>,
) -> prometheus::Result<()> {
    let collector = SessionsCollector::new(family, snapshot)?;
    registry.register(Box::new(collector))
}

/// Record the outcome of one poll
pub fn record_poll(family: UpstreamFamily, outcome: &str, duration: Duration) {
    UPSTREAM_REQUESTS_TOTAL
        .with_label_values(&[family.as_str(), outcome])
        .inc();

    UPSTREAM_REQUEST_DURATION_SECONDS
        .with_label_values(&[family.as_str()])
        .observe(duration.as_secs_f64());

    if outcome == "success" {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
        LAST_SUCCESSFUL_POLL_TIMESTAMP_SECONDS
            .with_label_values(&[family.as_str()])
            .set(now);
    }
}

/// Record a session field that fell back to its error marker
pub fn record_field_extraction_error(family: UpstreamFamily, field: &str) {
    FIELD_EXTRACTION_ERRORS_TOTAL
        .with_label_values(&[family.as_str(), field])
        .inc();
}

/// Render everything in `registry` in the Prometheus text format
pub fn render(registry: &Registry) -> prometheus::Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();

    let mut buffer = vec![];
    encoder.encode(&metric_families, &mut buffer)?;
    encoded_text(buffer)
}

fn encoded_text(buffer: Vec<u8>) -> prometheus::Result<String> {
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Metrics output is not UTF-8: {}", e)))
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler(State(registry): State<Registry>) -> impl IntoResponse {
    match render(&registry) {
        Ok(response) => (StatusCode::OK, response),
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}
