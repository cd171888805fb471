//! HTTP request handlers for the booth service.

pub mod auth_handler;
pub mod health;
pub mod metrics;
pub mod session;

pub use auth_handler::{login, logout};
pub use health::health_check;
pub use metrics::metrics_handler;
pub use session::get_session;
