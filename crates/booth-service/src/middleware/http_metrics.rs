//! HTTP metrics middleware.
//!
//! Applied as the outermost layer so framework-level rejections (404, 405,
//! 415, JSON parse errors) and guard rejections are counted too.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::observability::metrics::record_http_request;

/// Record method, normalized path, status code, and duration for every response.
pub async fn http_metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    record_http_request(&method, &path, response.status().as_u16(), start.elapsed());

    response
}
