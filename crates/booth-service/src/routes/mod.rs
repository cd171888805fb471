//! HTTP routes for the booth service.
//!
//! Defines the Axum router and application state.

use crate::auth::{CookieSettings, Role, TokenIssuer, TokenSettings, TokenValidator};
use crate::config::Config;
use crate::handlers;
use crate::middleware::auth::{require_access, AccessGuard, AccessPolicy};
use crate::middleware::http_metrics::http_metrics_middleware;
use crate::repositories::EventSecretStore;
use crate::services::login_service::LoginSecrets;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Arc<Config>,

    /// Mints tokens after a successful login.
    pub issuer: Arc<TokenIssuer>,

    /// Shared by every guard.
    pub validator: Arc<TokenValidator>,

    /// Session cookie attributes.
    pub cookies: Arc<CookieSettings>,

    /// Admin and global vendor passwords.
    pub login_secrets: Arc<LoginSecrets>,

    /// Per-event vendor passwords.
    pub event_store: Arc<dyn EventSecretStore>,
}

impl AppState {
    /// Build issuer, validator, and cookie settings from one immutable config.
    pub fn new(config: Config, event_store: Arc<dyn EventSecretStore>) -> Self {
        let settings = Arc::new(TokenSettings::from_config(&config));

        Self {
            issuer: Arc::new(TokenIssuer::new(Arc::clone(&settings))),
            validator: Arc::new(TokenValidator::new(settings)),
            cookies: Arc::new(CookieSettings::from_config(&config)),
            login_secrets: Arc::new(LoginSecrets::from_config(&config)),
            config: Arc::new(config),
            event_store,
        }
    }

    /// Guard sharing this state's validator and cookie name.
    pub fn guard(&self, policy: AccessPolicy) -> Arc<AccessGuard> {
        Arc::new(AccessGuard::new(
            Arc::clone(&self.validator),
            self.cookies.name.clone(),
            policy,
        ))
    }
}

/// Build the application routes.
///
/// - `/health` - Liveness probe, public
/// - `/metrics` - Prometheus metrics, public
/// - `/api/auth/login`, `/api/auth/logout` - public
/// - `/api/auth/session` - any valid credential
/// - `/api/admin/session` - admin only
/// - `/api/events/:event_id/session` - admin or vendor, event-scoped vendors narrowed to `event_id`
/// - TraceLayer, 30 second timeout, HTTP metrics (outermost)
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/logout", post(handlers::logout))
        .with_state(state.clone());

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    let session_routes = Router::new()
        .route("/api/auth/session", get(handlers::get_session))
        .route_layer(middleware::from_fn_with_state(
            state.guard(AccessPolicy::any_role()),
            require_access,
        ));

    let admin_routes = Router::new()
        .route("/api/admin/session", get(handlers::get_session))
        .route_layer(middleware::from_fn_with_state(
            state.guard(AccessPolicy::roles(&[Role::Admin])),
            require_access,
        ));

    let event_routes = Router::new()
        .route("/api/events/:event_id/session", get(handlers::get_session))
        .route_layer(middleware::from_fn_with_state(
            state.guard(AccessPolicy::roles(&[Role::Admin, Role::Vendor]).with_event_match()),
            require_access,
        ));

    // Each .layer() wraps the ones before it:
    // 1. TraceLayer (innermost)
    // 2. TimeoutLayer
    // 3. http_metrics_middleware (outermost, sees every response)
    public_routes
        .merge(metrics_routes)
        .merge(session_routes)
        .merge(admin_routes)
        .merge(event_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(middleware::from_fn(http_metrics_middleware))
}
