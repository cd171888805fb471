//! HTTP middleware for the booth service.

pub mod auth;
pub mod http_metrics;
