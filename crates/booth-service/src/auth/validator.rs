//! Access token validation.
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing
//! - Only the configured HMAC algorithm is accepted
//! - `exp` and `iat` are checked against an explicit `now`; `exp` has no leeway
//! - Every failure surfaces to clients as the same `InvalidToken` response

use crate::auth::claims::{Access, AccessClaims, EventId, Role};
use crate::auth::TokenSettings;
use crate::errors::BoothError;
use crate::observability::metrics::record_token_validation;
use common::jwt::{check_token_size, validate_exp_at, validate_iat_at, JwtValidationError};
use common::secret::ExposeSecret;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

/// Why a token was rejected.
///
/// Used for logs and metrics only; clients always see [`BoothError::InvalidToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("no token presented")]
    Missing,

    #[error("token exceeds size limit")]
    TooLarge,

    #[error("token is malformed")]
    Malformed,

    #[error("token signature or algorithm mismatch")]
    BadSignature,

    #[error("token issuer mismatch")]
    WrongIssuer,

    #[error("token expired")]
    Expired,

    #[error("token issued in the future")]
    NotYetValid,

    #[error("token claims are invalid")]
    InvalidClaims,
}

impl TokenError {
    /// Bounded label for the `error_category` metric.
    pub fn category(&self) -> &'static str {
        match self {
            TokenError::Missing => "missing",
            TokenError::TooLarge => "too_large",
            TokenError::Malformed => "malformed",
            TokenError::BadSignature => "bad_signature",
            TokenError::WrongIssuer => "wrong_issuer",
            TokenError::Expired => "expired",
            TokenError::NotYetValid => "not_yet_valid",
            TokenError::InvalidClaims => "invalid_claims",
        }
    }
}

impl From<TokenError> for BoothError {
    fn from(_: TokenError) -> Self {
        BoothError::InvalidToken
    }
}

impl From<JwtValidationError> for TokenError {
    fn from(err: JwtValidationError) -> Self {
        match err {
            JwtValidationError::TokenTooLarge => TokenError::TooLarge,
            JwtValidationError::IatTooFarInFuture => TokenError::NotYetValid,
            JwtValidationError::Expired => TokenError::Expired,
        }
    }
}

/// Verifies tokens minted by [`crate::auth::TokenIssuer`] with the same settings.
#[derive(Debug, Clone)]
pub struct TokenValidator {
    settings: Arc<TokenSettings>,
}

impl TokenValidator {
    pub fn new(settings: Arc<TokenSettings>) -> Self {
        Self { settings }
    }

    /// Validate `token` as of `now` (Unix epoch seconds).
    ///
    /// # Checks
    ///
    /// 1. Size limit
    /// 2. Signature with the configured algorithm and secret
    /// 3. Issuer and presence of `exp`, `iat`, `iss`
    /// 4. Claim shape: `exp > iat`, event tokens carry an event id
    /// 5. `now < exp`
    /// 6. `iat <= now + clock_skew`
    #[instrument(skip_all)]
    pub fn validate_at(&self, token: &str, now: i64) -> Result<AccessClaims, TokenError> {
        let result = self.check(token, now);

        match &result {
            Ok(claims) => {
                tracing::debug!(
                    target: "booth.auth.validator",
                    role = %claims.role,
                    access = %claims.access,
                    "Token validated successfully"
                );
                record_token_validation("success", None);
            }
            Err(err) => {
                tracing::debug!(
                    target: "booth.auth.validator",
                    reason = err.category(),
                    "Token rejected"
                );
                record_token_validation("error", Some(err.category()));
            }
        }

        result
    }

    fn check(&self, token: &str, now: i64) -> Result<AccessClaims, TokenError> {
        check_token_size(token)?;

        let mut validation = Validation::new(self.settings.algorithm);
        // exp is checked below against the caller's `now`
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.set_issuer(&[self.settings.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iat", "iss"]);

        let decoding_key = DecodingKey::from_secret(self.settings.secret.expose_secret().as_bytes());

        let claims = decode::<WireClaims>(token, &decoding_key, &validation)
            .map_err(|e| classify(e.kind()))?
            .claims
            .into_claims()?;

        if claims.exp <= claims.iat || claims.scope().is_none() {
            return Err(TokenError::InvalidClaims);
        }

        validate_exp_at(claims.exp, now)?;
        validate_iat_at(claims.iat, self.settings.clock_skew, now)?;

        Ok(claims)
    }
}

/// Decoding target with optional registered claims.
///
/// Absent `exp`, `iat` or `iss` must reach the required-claim check rather
/// than failing deserialization.
#[derive(Deserialize)]
struct WireClaims {
    role: Role,
    access: Access,
    #[serde(default)]
    event_id: Option<EventId>,
    iat: Option<i64>,
    exp: Option<i64>,
    iss: Option<String>,
}

impl WireClaims {
    fn into_claims(self) -> Result<AccessClaims, TokenError> {
        match (self.iat, self.exp, self.iss) {
            (Some(iat), Some(exp), Some(iss)) => Ok(AccessClaims {
                role: self.role,
                access: self.access,
                event_id: self.event_id,
                iat,
                exp,
                iss,
            }),
            _ => Err(TokenError::InvalidClaims),
        }
    }
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::BadSignature,
        ErrorKind::InvalidIssuer => TokenError::WrongIssuer,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::ImmatureSignature => TokenError::NotYetValid,
        ErrorKind::MissingRequiredClaim(_) => TokenError::InvalidClaims,
        _ => TokenError::Malformed,
    }
}
