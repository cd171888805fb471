//! Per-event vendor secrets.
//!
//! The login flow asks the store for an event's vendor password; nothing
//! else in this service reads event data.

use crate::auth::claims::EventId;
use crate::errors::BoothError;
use crate::observability::metrics::record_db_query;
use async_trait::async_trait;
use common::secret::SecretString;
use sqlx::PgPool;
use std::collections::HashMap;
use std::time::Instant;

/// Lookup of per-event vendor passwords.
#[async_trait]
pub trait EventSecretStore: Send + Sync {
    /// `None` when the event is unknown or has no vendor password.
    async fn vendor_password(&self, event_id: EventId) -> Result<Option<SecretString>, BoothError>;
}

/// Store backed by a fixed map, loaded from configuration.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventSecrets {
    passwords: HashMap<EventId, SecretString>,
}

impl InMemoryEventSecrets {
    pub fn new(passwords: HashMap<EventId, SecretString>) -> Self {
        Self { passwords }
    }

    pub fn with_event(mut self, event_id: EventId, password: impl Into<String>) -> Self {
        self.passwords
            .insert(event_id, SecretString::from(password.into()));
        self
    }
}

#[async_trait]
impl EventSecretStore for InMemoryEventSecrets {
    async fn vendor_password(&self, event_id: EventId) -> Result<Option<SecretString>, BoothError> {
        Ok(self.passwords.get(&event_id).cloned())
    }
}

/// Store backed by the `events` table.
#[derive(Debug, Clone)]
pub struct PgEventSecretStore {
    pool: PgPool,
}

impl PgEventSecretStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventSecretStore for PgEventSecretStore {
    async fn vendor_password(&self, event_id: EventId) -> Result<Option<SecretString>, BoothError> {
        let start = Instant::now();
        let result = sqlx::query_scalar::<_, Option<String>>(
            r#"
            SELECT vendor_password
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await;

        let status = if result.is_ok() { "success" } else { "error" };
        record_db_query("select", "events", status, start.elapsed());

        let password = result
            .map_err(|e| BoothError::Database(format!("Failed to fetch event vendor password: {}", e)))?
            .flatten()
            .filter(|password| !password.is_empty());

        Ok(password.map(SecretString::from))
    }
}
