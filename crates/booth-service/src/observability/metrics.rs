//! Metrics definitions for the booth service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `booth_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `role`: 2 values (admin, vendor)
//! - `access`: 2 values (all, event)
//! - `status`: success, error
//! - `error_category`: bounded by `TokenError::category`
//! - `outcome`: allowed, insufficient_role, event_not_authorized, invalid_event_context, invalid_token
//! - `table`: bounded by schema (events)
//! - `endpoint`: normalized, event ids replaced by `{event_id}`

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Install the global Prometheus recorder.
///
/// Must be called once before any metric is recorded.
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    build_recorder_builder()?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

/// Builder with the service's histogram buckets, shared with tests that
/// need a handle without a global install.
pub fn build_recorder_builder() -> Result<PrometheusBuilder, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("booth_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.200, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("booth_db_query".to_string()),
            &[
                0.001, 0.002, 0.005, 0.010, 0.020, 0.050, 0.100, 0.250, 0.500, 1.000,
            ],
        )
        .map_err(|e| format!("Failed to set DB query buckets: {e}"))
}

// ============================================================================
// Token Metrics
// ============================================================================

/// Record a token issuance.
///
/// Metric: `booth_token_issuance_total`
/// Labels: `role`, `access`
pub fn record_token_issuance(role: &str, access: &str) {
    counter!("booth_token_issuance_total", "role" => role.to_string(), "access" => access.to_string())
        .increment(1);
}

/// Record a token validation result.
///
/// Metric: `booth_token_validations_total`
/// Labels: `status`, `error_category`
pub fn record_token_validation(status: &str, error_category: Option<&str>) {
    let category = error_category.unwrap_or("none");
    counter!("booth_token_validations_total", "status" => status.to_string(), "error_category" => category.to_string())
        .increment(1);
}

// ============================================================================
// Guard and Login Metrics
// ============================================================================

/// Record an access guard decision.
///
/// Metric: `booth_guard_decisions_total`
/// Labels: `outcome`
pub fn record_guard_decision(outcome: &str) {
    counter!("booth_guard_decisions_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record a login attempt.
///
/// Metric: `booth_login_attempts_total`
/// Labels: `role`, `status`
pub fn record_login_attempt(role: &str, status: &str) {
    counter!("booth_login_attempts_total", "role" => role.to_string(), "status" => status.to_string())
        .increment(1);
}

// ============================================================================
// Database Metrics
// ============================================================================

/// Record a database query.
///
/// Metrics: `booth_db_query_duration_seconds`, `booth_db_queries_total`
/// Labels: `operation`, `table`, `status`
pub fn record_db_query(operation: &str, table: &str, status: &str, duration: Duration) {
    histogram!("booth_db_query_duration_seconds", "operation" => operation.to_string(), "table" => table.to_string())
        .record(duration.as_secs_f64());

    counter!("booth_db_queries_total", "operation" => operation.to_string(), "table" => table.to_string(), "status" => status.to_string())
        .increment(1);
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record an HTTP request.
///
/// Metrics: `booth_http_requests_total`, `booth_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status_code` / `status`
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("booth_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint.clone(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("booth_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

fn normalize_endpoint(path: &str) -> String {
    match path {
        "/health" | "/metrics" | "/api/auth/login" | "/api/auth/logout"
        | "/api/auth/session" | "/api/admin/session" => path.to_string(),
        _ => normalize_dynamic_endpoint(path),
    }
}

/// Replace event ids with a placeholder; anything unknown becomes `/other`.
fn normalize_dynamic_endpoint(path: &str) -> String {
    let parts: Vec<&str> = path.split('/').collect();

    // /api/events/{event_id}/session
    if let ["", "api", "events", _, "session"] = parts.as_slice() {
        return "/api/events/{event_id}/session".to_string();
    }

    "/other".to_string()
}
