//! Prometheus metrics
//!
//! Counters and latency histograms recorded through the `metrics` facade,
//! rendered at `GET /metrics`.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use std::time::Duration;

use crate::state::AppState;

static PROMETHEUS: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the global Prometheus recorder
///
/// Safe to call more than once; later calls return the first handle.
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PROMETHEUS.get_or_try_init(|| PrometheusBuilder::new().install_recorder()) {
        Ok(handle) => Some(handle.clone()),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install Prometheus recorder");
            None
        }
    }
}

/// Count a handled utterance by intent
pub fn record_request(intent: &'static str) {
    metrics::counter!("ruby_requests_total", "intent" => intent).increment(1);
}

/// Count a failed request by error kind
pub fn record_error(kind: &'static str) {
    metrics::counter!("ruby_errors_total", "kind" => kind).increment(1);
}

pub fn record_latency(route: &'static str, elapsed: Duration) {
    metrics::histogram!("ruby_request_duration_seconds", "route" => route)
        .record(elapsed.as_secs_f64());
}

pub fn record_reminder_fired() {
    metrics::counter!("ruby_reminders_fired_total").increment(1);
}

/// Prometheus text exposition
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}
