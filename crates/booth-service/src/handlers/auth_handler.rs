//! Login and logout.

use crate::auth::claims::{Access, EventId, Role};
use crate::errors::BoothError;
use crate::routes::AppState;
use crate::services::login_service::{self, LoginAttempt, SubmittedPassword};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Any JSON value; only a string can match a secret.
    #[serde(default)]
    pub password: Option<SubmittedPassword>,

    #[serde(default)]
    pub role: Option<String>,

    /// Integer or numeric string; validated during vendor login.
    #[serde(default, rename = "eventId")]
    pub event_id: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub role: Role,
    pub access: Access,
    #[serde(rename = "eventId", skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: &'static str,
}

/// POST /api/auth/login
///
/// Returns the token in the body and mirrors it into the session cookie.
#[instrument(skip_all, name = "booth.auth.login")]
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, BoothError> {
    // An unreadable body carries no password or role
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(target: "booth.login", error = %rejection, "Unreadable login body");
        BoothError::BadRequest("Missing password or role".to_string())
    })?;

    let grant = login_service::authenticate(
        &state.login_secrets,
        state.event_store.as_ref(),
        LoginAttempt {
            role: payload.role.as_deref(),
            password: payload.password.as_ref(),
            event_id: payload.event_id.as_ref(),
        },
    )
    .await?;

    let token = state.issuer.issue(grant.role, grant.scope)?;
    let cookie = state.cookies.build_set_cookie(&token);

    let message = match grant.role {
        Role::Admin => "Admin login successful",
        Role::Vendor => "Vendor login successful",
    };

    let body = LoginResponse {
        message: message.to_string(),
        role: grant.role,
        access: grant.scope.access(),
        event_id: grant.scope.event_id(),
        access_token: token,
        token_type: "Bearer",
        expires_in: state.issuer.ttl_seconds(),
    };

    Ok(([(header::SET_COOKIE, cookie)], Json(body)))
}

/// POST /api/auth/logout
///
/// Expires the session cookie. Issued tokens stay valid until `exp`.
#[instrument(skip_all, name = "booth.auth.logout")]
pub async fn logout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, state.cookies.build_clear_cookie())],
        Json(LogoutResponse {
            message: "Logged out",
        }),
    )
}
