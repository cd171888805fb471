//! Booth Service error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl.
//! Every credential failure collapses into a single `InvalidToken` response
//! so callers cannot tell a missing token from a forged or expired one.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Client-facing message for every authentication failure.
pub const INVALID_TOKEN_MESSAGE: &str = "The access token is invalid or expired";

/// Booth Service error type.
///
/// Maps to HTTP status codes:
/// - InvalidToken, InvalidCredentials: 401 Unauthorized
/// - InsufficientRole, EventNotAuthorized: 403 Forbidden
/// - InvalidEventContext, BadRequest: 400 Bad Request
/// - Database, Crypto, Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum BoothError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Forbidden: insufficient role")]
    InsufficientRole,

    #[error("Forbidden: event not authorized")]
    EventNotAuthorized,

    #[error("Invalid event context: {0}")]
    InvalidEventContext(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Internal server error")]
    Internal,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for BoothError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            BoothError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                INVALID_TOKEN_MESSAGE.to_string(),
            ),
            BoothError::InvalidCredentials(reason) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                reason.clone(),
            ),
            BoothError::InsufficientRole => (
                StatusCode::FORBIDDEN,
                "INSUFFICIENT_ROLE",
                "Forbidden: insufficient role".to_string(),
            ),
            BoothError::EventNotAuthorized => (
                StatusCode::FORBIDDEN,
                "EVENT_NOT_AUTHORIZED",
                "Forbidden: event not authorized".to_string(),
            ),
            BoothError::InvalidEventContext(reason) => (
                StatusCode::BAD_REQUEST,
                "INVALID_EVENT_CONTEXT",
                reason.clone(),
            ),
            BoothError::BadRequest(reason) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", reason.clone())
            }
            BoothError::Database(err) => {
                // Log actual error server-side, return generic message to client
                tracing::error!(target: "booth.database", error = %err, "Database operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "An internal database error occurred".to_string(),
                )
            }
            BoothError::Crypto(err) => {
                tracing::error!(target: "booth.crypto", error = %err, "Cryptographic operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CRYPTO_ERROR",
                    "An internal cryptographic error occurred".to_string(),
                )
            }
            BoothError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        let mut response = (status, Json(error_response)).into_response();

        // Only bearer-token failures advertise the challenge; a failed login is not one
        if matches!(self, BoothError::InvalidToken) {
            if let Ok(header_value) =
                "Bearer realm=\"booth-service\", error=\"invalid_token\"".parse()
            {
                response
                    .headers_mut()
                    .insert("WWW-Authenticate", header_value);
            }
        }

        response
    }
}

/// Convert sqlx errors to BoothError
impl From<sqlx::Error> for BoothError {
    fn from(err: sqlx::Error) -> Self {
        BoothError::Database(err.to_string())
    }
}
