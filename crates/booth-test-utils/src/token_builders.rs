//! Builder patterns for test token construction
//!
//! Tokens the service would never mint (expired, foreign secret, wrong
//! issuer, broken scope) are built here.

use crate::crypto_fixtures::{TEST_ISSUER, TEST_JWT_SECRET};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;

/// Builder for signed test tokens
///
/// # Example
/// ```rust,ignore
/// let token = TestTokenBuilder::new()
///     .vendor()
///     .for_event(7)
///     .expires_in(-60)
///     .sign();
/// ```
pub struct TestTokenBuilder {
    role: String,
    access: String,
    event_id: Option<i64>,
    iat: i64,
    exp: i64,
    iss: String,
    secret: String,
    algorithm: Algorithm,
}

impl TestTokenBuilder {
    /// Admin, `all` scope, valid for one hour, signed with the test secret
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            role: "admin".to_string(),
            access: "all".to_string(),
            event_id: None,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(3600)).timestamp(),
            iss: TEST_ISSUER.to_string(),
            secret: TEST_JWT_SECRET.to_string(),
            algorithm: Algorithm::HS256,
        }
    }

    pub fn admin(mut self) -> Self {
        self.role = "admin".to_string();
        self
    }

    pub fn vendor(mut self) -> Self {
        self.role = "vendor".to_string();
        self
    }

    /// Any role string, including ones the service rejects
    pub fn with_role(mut self, role: &str) -> Self {
        self.role = role.to_string();
        self
    }

    /// Scope the token to one event
    pub fn for_event(mut self, event_id: i64) -> Self {
        self.access = "event".to_string();
        self.event_id = Some(event_id);
        self
    }

    /// Set `access` without touching `event_id`
    pub fn with_access(mut self, access: &str) -> Self {
        self.access = access.to_string();
        self
    }

    /// Set expiration in seconds from now (negative for expired)
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.exp = (Utc::now() + Duration::seconds(seconds)).timestamp();
        self
    }

    /// Set issued-at timestamp
    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.iat = timestamp;
        self
    }

    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.iss = issuer.to_string();
        self
    }

    pub fn signed_with(mut self, secret: &str) -> Self {
        self.secret = secret.to_string();
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Build the claims as a JSON value
    pub fn claims(&self) -> serde_json::Value {
        json!({
            "role": self.role,
            "access": self.access,
            "event_id": self.event_id,
            "iat": self.iat,
            "exp": self.exp,
            "iss": self.iss,
        })
    }

    /// Sign the claims
    pub fn sign(self) -> String {
        let mut header = Header::new(self.algorithm);
        header.typ = Some("JWT".to_string());

        encode(
            &header,
            &self.claims(),
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .expect("HMAC signing of test claims should not fail")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}
