//! JWT utilities shared across booth components.
//!
//! This module provides the time and size checks every credential goes
//! through before its claims are trusted:
//! - Size limits for DoS prevention
//! - Clock skew constants for iat validation
//! - iat / exp validation against an explicit clock
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (DoS prevention)
//! - A token is never valid at or after its `exp`
//! - Generic error messages prevent information leakage
//!
//! # Usage
//!
//! ```rust,ignore
//! use common::jwt::{check_token_size, validate_iat_at, validate_exp_at, DEFAULT_CLOCK_SKEW};
//!
//! check_token_size(token)?;
//!
//! // After signature verification
//! let now = chrono::Utc::now().timestamp();
//! validate_exp_at(claims.exp, now)?;
//! validate_iat_at(claims.iat, DEFAULT_CLOCK_SKEW, now)?;
//! ```

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Maximum allowed JWT size in bytes (8KB).
///
/// JWTs larger than this size are rejected BEFORE any parsing or
/// cryptographic operations.
///
/// # Rationale
///
/// - A booth access token is ~200 bytes (HMAC sig, five claims)
/// - 8KB leaves room for header growth while bounding decode work
pub const MAX_JWT_SIZE_BYTES: usize = 8192; // 8KB

/// Default JWT clock skew tolerance.
///
/// Issuer and verifier share one process clock, so no tolerance is applied
/// unless configured.
pub const DEFAULT_CLOCK_SKEW: Duration = Duration::ZERO;

/// Maximum allowed JWT clock skew tolerance (10 minutes).
///
/// Prevents misconfiguration that would accept tokens minted far in the future.
pub const MAX_CLOCK_SKEW: Duration = Duration::from_secs(600);

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during JWT time and size validation.
///
/// Note: Error messages are intentionally generic to prevent information leakage.
/// Detailed information is logged at debug level for troubleshooting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtValidationError {
    /// Token size exceeds maximum allowed.
    #[error("The access token is invalid or expired")]
    TokenTooLarge,

    /// Token `iat` claim is too far in the future.
    #[error("The access token is invalid or expired")]
    IatTooFarInFuture,

    /// Token `exp` claim is at or before the current time.
    #[error("The access token is invalid or expired")]
    Expired,
}

// =============================================================================
// Functions
// =============================================================================

/// Reject tokens larger than [`MAX_JWT_SIZE_BYTES`].
///
/// # Errors
///
/// Returns `JwtValidationError::TokenTooLarge` if the token exceeds the limit.
pub fn check_token_size(token: &str) -> Result<(), JwtValidationError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "common.jwt",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(JwtValidationError::TokenTooLarge);
    }
    Ok(())
}

/// Deterministic `iat` validation against an explicit `now` timestamp.
///
/// A token is not valid before its `iat`; `clock_skew` widens that window.
///
/// # Errors
///
/// Returns `JwtValidationError::IatTooFarInFuture` if `iat > now + clock_skew`.
pub fn validate_iat_at(
    iat: i64,
    clock_skew: Duration,
    now: i64,
) -> Result<(), JwtValidationError> {
    // Safe cast: clock_skew is bounded to MAX_CLOCK_SKEW (600 seconds) by config
    #[allow(clippy::cast_possible_wrap)]
    let clock_skew_secs = clock_skew.as_secs() as i64;
    let max_iat = now.saturating_add(clock_skew_secs);

    if iat > max_iat {
        tracing::debug!(
            target: "common.jwt",
            iat = iat,
            now = now,
            max_allowed = max_iat,
            clock_skew_secs = clock_skew_secs,
            "Token rejected: iat too far in the future"
        );
        return Err(JwtValidationError::IatTooFarInFuture);
    }

    Ok(())
}

/// Deterministic `exp` validation against an explicit `now` timestamp.
///
/// The token is expired once `now` reaches `exp`; there is no leeway.
///
/// # Errors
///
/// Returns `JwtValidationError::Expired` if `now >= exp`.
pub fn validate_exp_at(exp: i64, now: i64) -> Result<(), JwtValidationError> {
    if now >= exp {
        tracing::debug!(
            target: "common.jwt",
            exp = exp,
            now = now,
            "Token rejected: expired"
        );
        return Err(JwtValidationError::Expired);
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::cast_possible_wrap)]
mod tests {
    use super::*;

    #[test]
    fn test_max_jwt_size_is_8kb() {
        assert_eq!(MAX_JWT_SIZE_BYTES, 8192);
    }

    #[test]
    fn test_default_clock_skew_is_zero() {
        assert_eq!(DEFAULT_CLOCK_SKEW, Duration::ZERO);
    }

    #[test]
    fn test_max_clock_skew_is_10_minutes() {
        assert_eq!(MAX_CLOCK_SKEW, Duration::from_secs(600));
    }

    // -------------------------------------------------------------------------
    // check_token_size Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_check_token_size_at_limit() {
        let token = "a".repeat(MAX_JWT_SIZE_BYTES);
        assert!(check_token_size(&token).is_ok());
    }

    #[test]
    fn test_check_token_size_oversized() {
        let token = "a".repeat(MAX_JWT_SIZE_BYTES + 1);
        assert_eq!(
            check_token_size(&token),
            Err(JwtValidationError::TokenTooLarge)
        );
    }

    // -------------------------------------------------------------------------
    // validate_iat_at Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_validate_iat_current_time() {
        let now = 1_700_000_000_i64;
        assert!(validate_iat_at(now, DEFAULT_CLOCK_SKEW, now).is_ok());
    }

    #[test]
    fn test_validate_iat_past_time() {
        let now = 1_700_000_000_i64;
        assert!(validate_iat_at(now - 3600, DEFAULT_CLOCK_SKEW, now).is_ok());
    }

    #[test]
    fn test_validate_iat_far_future() {
        let now = 1_700_000_000_i64;
        assert!(matches!(
            validate_iat_at(now + 86400, MAX_CLOCK_SKEW, now),
            Err(JwtValidationError::IatTooFarInFuture)
        ));
    }

    #[test]
    fn test_validate_iat_without_skew_rejects_next_second() {
        let now = 1_700_000_000_i64;
        assert!(validate_iat_at(now, Duration::ZERO, now).is_ok());
        assert!(matches!(
            validate_iat_at(now + 1, Duration::ZERO, now),
            Err(JwtValidationError::IatTooFarInFuture)
        ));
    }

    #[test]
    fn test_validate_iat_at_boundary_exact() {
        let now = 1_700_000_000_i64;
        let skew = Duration::from_secs(300);

        // iat == now + skew is the last accepted value
        assert!(validate_iat_at(now + 300, skew, now).is_ok());

        // iat == now + skew + 1 is the first rejected value
        assert!(matches!(
            validate_iat_at(now + 301, skew, now),
            Err(JwtValidationError::IatTooFarInFuture)
        ));
    }

    // -------------------------------------------------------------------------
    // validate_exp_at Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_validate_exp_before_expiry() {
        let now = 1_700_000_000_i64;
        assert!(validate_exp_at(now + 1, now).is_ok());
    }

    #[test]
    fn test_validate_exp_at_expiry_is_rejected() {
        let now = 1_700_000_000_i64;
        assert_eq!(validate_exp_at(now, now), Err(JwtValidationError::Expired));
    }

    #[test]
    fn test_validate_exp_after_expiry_is_rejected() {
        let now = 1_700_000_000_i64;
        assert_eq!(
            validate_exp_at(now - 60, now),
            Err(JwtValidationError::Expired)
        );
    }

    #[test]
    fn test_error_messages_are_generic() {
        for err in [
            JwtValidationError::TokenTooLarge,
            JwtValidationError::IatTooFarInFuture,
            JwtValidationError::Expired,
        ] {
            assert_eq!(err.to_string(), "The access token is invalid or expired");
        }
    }
}
