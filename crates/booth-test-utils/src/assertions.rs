//! Custom test assertions for expressive tests
//!
//! Decodes a token's header and payload WITHOUT verifying the signature, so
//! tests can check what the service put into it.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

#[derive(Debug, Deserialize)]
struct JwtClaims {
    pub role: String,
    pub access: String,
    #[serde(default)]
    pub event_id: Option<i64>,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

fn decode_part<T: for<'de> Deserialize<'de>>(token: &str, index: usize, what: &str) -> T {
    let part = token
        .split('.')
        .nth(index)
        .unwrap_or_else(|| panic!("JWT has no {} part", what));
    let bytes = URL_SAFE_NO_PAD
        .decode(part)
        .unwrap_or_else(|e| panic!("Failed to base64 decode JWT {}: {}", what, e));
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("Failed to parse JWT {} JSON: {}", what, e))
}

/// Custom assertions for issued tokens
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_valid_jwt("HS256")
///     .assert_role("vendor")
///     .assert_event_scope(3)
///     .assert_lifetime(7200);
/// ```
pub trait TokenAssertions {
    /// Three parts, decodable header with the given algorithm and `typ: JWT`
    fn assert_valid_jwt(&self, algorithm: &str) -> &Self;

    fn assert_role(&self, role: &str) -> &Self;

    /// `access = all` and no event id
    fn assert_all_scope(&self) -> &Self;

    /// `access = event` bound to `event_id`
    fn assert_event_scope(&self, event_id: i64) -> &Self;

    /// `exp - iat` equals `seconds`
    fn assert_lifetime(&self, seconds: i64) -> &Self;

    fn assert_issuer(&self, issuer: &str) -> &Self;
}

impl TokenAssertions for str {
    fn assert_valid_jwt(&self, algorithm: &str) -> &Self {
        assert_eq!(
            self.split('.').count(),
            3,
            "JWT must have 3 parts (header.payload.signature)"
        );

        let header: JwtHeader = decode_part(self, 0, "header");
        assert_eq!(header.alg, algorithm, "Unexpected JWT algorithm");
        assert_eq!(header.typ, "JWT", "Expected JWT type");

        let _: JwtClaims = decode_part(self, 1, "payload");
        self
    }

    fn assert_role(&self, role: &str) -> &Self {
        let claims: JwtClaims = decode_part(self, 1, "payload");
        assert_eq!(claims.role, role, "Unexpected role claim");
        self
    }

    fn assert_all_scope(&self) -> &Self {
        let claims: JwtClaims = decode_part(self, 1, "payload");
        assert_eq!(claims.access, "all", "Expected access=all");
        assert_eq!(claims.event_id, None, "access=all must not carry an event id");
        self
    }

    fn assert_event_scope(&self, event_id: i64) -> &Self {
        let claims: JwtClaims = decode_part(self, 1, "payload");
        assert_eq!(claims.access, "event", "Expected access=event");
        assert_eq!(claims.event_id, Some(event_id), "Unexpected event id");
        self
    }

    fn assert_lifetime(&self, seconds: i64) -> &Self {
        let claims: JwtClaims = decode_part(self, 1, "payload");
        assert!(claims.iat < claims.exp, "iat must precede exp");
        assert_eq!(claims.exp - claims.iat, seconds, "Unexpected token lifetime");
        self
    }

    fn assert_issuer(&self, issuer: &str) -> &Self {
        let claims: JwtClaims = decode_part(self, 1, "payload");
        assert_eq!(claims.iss, issuer, "Unexpected issuer");
        self
    }
}
