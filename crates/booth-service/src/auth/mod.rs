//! Token minting, validation, and the claims they carry.

pub mod claims;
pub mod cookie;
pub mod issuer;
pub mod validator;

pub use claims::{Access, AccessClaims, AccessScope, EventId, Role};
pub use cookie::{read_cookie, CookieSettings, SameSite};
pub use issuer::TokenIssuer;
pub use validator::{TokenError, TokenValidator};

use crate::config::Config;
use common::secret::SecretString;
use jsonwebtoken::Algorithm;
use std::fmt;
use std::time::Duration;

/// Signing parameters shared by the issuer and the validator.
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: SecretString,
    pub algorithm: Algorithm,
    pub ttl_minutes: i64,
    pub issuer: String,
    pub clock_skew: Duration,
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .field("ttl_minutes", &self.ttl_minutes)
            .field("issuer", &self.issuer)
            .field("clock_skew", &self.clock_skew)
            .finish()
    }
}

impl TokenSettings {
    pub fn new(
        secret: SecretString,
        algorithm: Algorithm,
        ttl_minutes: i64,
        issuer: impl Into<String>,
        clock_skew: Duration,
    ) -> Self {
        Self {
            secret,
            algorithm,
            ttl_minutes,
            issuer: issuer.into(),
            clock_skew,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.jwt_secret.clone(),
            config.jwt_algorithm,
            config.jwt_access_expires_min,
            config.jwt_issuer.clone(),
            config.jwt_clock_skew,
        )
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_minutes.saturating_mul(60)
    }
}
