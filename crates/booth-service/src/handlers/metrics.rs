//! Prometheus metrics endpoint.
//!
//! Unauthenticated so Prometheus can scrape it. Labels are bounded and carry
//! no secrets or tokens.

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// GET /metrics
///
/// ```text
/// # TYPE booth_token_issuance_total counter
/// booth_token_issuance_total{role="admin",access="all"} 3
/// ```
#[tracing::instrument(skip_all, name = "booth.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
