//! Session introspection.
//!
//! Echoes the claims the guard injected, so clients can learn their role and
//! scope without decoding the token themselves.

use crate::auth::claims::{Access, AccessClaims, EventId, Role};
use axum::{Extension, Json};
use serde::Serialize;

/// Decoded session as returned to clients.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub role: Role,
    pub access: Access,
    #[serde(rename = "eventId", skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
    pub iat: i64,
    pub exp: i64,
}

impl From<&AccessClaims> for SessionResponse {
    fn from(claims: &AccessClaims) -> Self {
        Self {
            role: claims.role,
            access: claims.access,
            event_id: claims.bound_event_id(),
            iat: claims.iat,
            exp: claims.exp,
        }
    }
}

/// GET /api/auth/session, /api/admin/session, /api/events/:event_id/session
#[tracing::instrument(skip_all, name = "booth.session.get")]
pub async fn get_session(Extension(claims): Extension<AccessClaims>) -> Json<SessionResponse> {
    Json(SessionResponse::from(&claims))
}
