//! Access token minting.

use crate::auth::claims::{AccessClaims, AccessScope, Role};
use crate::auth::TokenSettings;
use crate::errors::BoothError;
use crate::observability::metrics::record_token_issuance;
use common::secret::ExposeSecret;
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;
use tracing::instrument;

/// Signs access tokens with the configured shared secret.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    settings: Arc<TokenSettings>,
}

impl TokenIssuer {
    pub fn new(settings: Arc<TokenSettings>) -> Self {
        Self { settings }
    }

    /// Lifetime of issued tokens in seconds.
    pub fn ttl_seconds(&self) -> i64 {
        self.settings.ttl_seconds()
    }

    /// Mint a token for `role` and `scope`, issued now.
    pub fn issue(&self, role: Role, scope: AccessScope) -> Result<String, BoothError> {
        self.issue_at(role, scope, chrono::Utc::now().timestamp())
    }

    /// Mint a token issued at `now` and expiring `ttl_minutes` later.
    #[instrument(skip_all, fields(role = %role, access = %scope.access()))]
    pub fn issue_at(&self, role: Role, scope: AccessScope, now: i64) -> Result<String, BoothError> {
        let claims = AccessClaims::new(
            role,
            scope,
            now,
            now.saturating_add(self.settings.ttl_seconds()),
            &self.settings.issuer,
        );

        let mut header = Header::new(self.settings.algorithm);
        header.typ = Some("JWT".to_string());

        let encoding_key = EncodingKey::from_secret(self.settings.secret.expose_secret().as_bytes());

        let token = encode(&header, &claims, &encoding_key)
            .map_err(|e| BoothError::Crypto(format!("JWT signing operation failed: {}", e)))?;

        tracing::debug!(
            target: "booth.auth.issuer",
            role = %claims.role,
            access = %claims.access,
            event_id = ?claims.event_id,
            exp = claims.exp,
            "Issued access token"
        );
        record_token_issuance(role.as_str(), scope.access().as_str());

        Ok(token)
    }
}
