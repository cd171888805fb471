//! Observability for the booth service.
//!
//! Metrics are exposed in Prometheus format at `/metrics`. Logging goes
//! through `tracing` with per-module targets (`booth.auth.*`, `booth.guard`,
//! `booth.login`).

pub mod metrics;
