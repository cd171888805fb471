//! Liveness probe.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health
///
/// Token verification needs no external dependency, so liveness is all there is.
#[tracing::instrument(skip_all, name = "booth.health.check")]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}
