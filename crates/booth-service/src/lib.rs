//! Booth Service Library
//!
//! Authentication and authorization core of the booth sales backend:
//!
//! - Password login against admin, global vendor, and per-event vendor secrets
//! - Issuance of signed, time-limited access tokens carrying a role and scope
//! - An access guard that verifies tokens and enforces role and event scope
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> middleware/auth.rs -> handlers/*.rs -> services/*.rs -> repositories/*.rs
//! ```
//!
//! # Modules
//!
//! - `auth` - Claims, token issuer and validator, session cookie
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - Access guard and HTTP metrics
//! - `observability` - Prometheus metrics
//! - `repositories` - Per-event vendor secret lookup
//! - `routes` - Axum router setup
//! - `services` - Login rules

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
