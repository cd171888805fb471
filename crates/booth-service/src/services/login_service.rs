//! Password login.
//!
//! Decides which role and scope a submitted password earns. Token minting
//! happens in the handler once a [`Grant`] comes back.

use crate::auth::claims::{AccessScope, EventId, Role};
use crate::config::Config;
use crate::errors::BoothError;
use crate::observability::metrics::record_login_attempt;
use crate::repositories::EventSecretStore;
use common::secret::{constant_time_eq, ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::fmt;
use tracing::instrument;

/// Global secrets checked before any per-event lookup.
#[derive(Clone)]
pub struct LoginSecrets {
    admin_password: SecretString,
    vendor_password: SecretString,
}

impl fmt::Debug for LoginSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginSecrets")
            .field("admin_password", &"[REDACTED]")
            .field("vendor_password", &"[REDACTED]")
            .finish()
    }
}

impl LoginSecrets {
    pub fn new(admin_password: SecretString, vendor_password: SecretString) -> Self {
        Self {
            admin_password,
            vendor_password,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.admin_password.clone(), config.vendor_password.clone())
    }

    fn is_admin(&self, password: &SubmittedPassword) -> bool {
        password.matches(&self.admin_password)
    }

    fn is_vendor(&self, password: &SubmittedPassword) -> bool {
        password.matches(&self.vendor_password)
    }
}

/// What a successful login is entitled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    pub role: Role,
    pub scope: AccessScope,
}

/// The `password` field of a login body, which may be any JSON value.
///
/// `null`, `false`, `0`, `""`, `[]` and `{}` count as absent. Other
/// non-string values are present but never equal a configured secret.
#[derive(Debug)]
pub enum SubmittedPassword {
    Empty,
    Text(SecretString),
    NonText,
}

impl SubmittedPassword {
    pub fn from_value(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null | Value::Bool(false) => Self::Empty,
            Value::String(s) if s.is_empty() => Self::Empty,
            Value::String(s) => Self::Text(SecretString::from(s)),
            Value::Number(n) if n.as_f64() == Some(0.0) => Self::Empty,
            Value::Array(items) if items.is_empty() => Self::Empty,
            Value::Object(fields) if fields.is_empty() => Self::Empty,
            _ => Self::NonText,
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.expose_secret().is_empty(),
            Self::NonText => false,
        }
    }

    fn matches(&self, secret: &SecretString) -> bool {
        match self {
            Self::Text(s) => constant_time_eq(
                s.expose_secret().as_bytes(),
                secret.expose_secret().as_bytes(),
            ),
            Self::Empty | Self::NonText => false,
        }
    }
}

impl From<&str> for SubmittedPassword {
    fn from(value: &str) -> Self {
        Self::from_value(serde_json::Value::String(value.to_string()))
    }
}

impl<'de> Deserialize<'de> for SubmittedPassword {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from_value)
    }
}

/// Login fields as submitted; any of them may be absent.
#[derive(Debug, Default)]
pub struct LoginAttempt<'a> {
    pub role: Option<&'a str>,
    pub password: Option<&'a SubmittedPassword>,
    pub event_id: Option<&'a serde_json::Value>,
}

/// Check a login attempt against the configured and per-event secrets.
///
/// # Rules
///
/// 1. Missing or empty password or role: 400
/// 2. `admin`: the admin password grants `admin/all`
/// 3. `vendor`: the admin or global vendor password grants `vendor/all`;
///    otherwise a matching per-event password grants `vendor/event`
/// 4. Any other role: 400
#[instrument(skip_all, fields(role = attempt.role.unwrap_or("")))]
pub async fn authenticate(
    secrets: &LoginSecrets,
    store: &dyn EventSecretStore,
    attempt: LoginAttempt<'_>,
) -> Result<Grant, BoothError> {
    let result = check(secrets, store, &attempt).await;

    let role_label = attempt.role.and_then(Role::parse).map_or("unknown", |r| r.as_str());
    match &result {
        Ok(grant) => {
            tracing::info!(
                target: "booth.login",
                role = %grant.role,
                access = %grant.scope.access(),
                event_id = ?grant.scope.event_id(),
                "Login succeeded"
            );
            record_login_attempt(role_label, "success");
        }
        Err(err) => {
            tracing::info!(target: "booth.login", role = role_label, error = %err, "Login rejected");
            record_login_attempt(role_label, "error");
        }
    }

    result
}

async fn check(
    secrets: &LoginSecrets,
    store: &dyn EventSecretStore,
    attempt: &LoginAttempt<'_>,
) -> Result<Grant, BoothError> {
    let (role, password) = match (attempt.role, attempt.password) {
        (Some(role), Some(password)) if !role.is_empty() && !password.is_empty() => (role, password),
        _ => return Err(BoothError::BadRequest("Missing password or role".to_string())),
    };

    match Role::parse(role) {
        Some(Role::Admin) => {
            if secrets.is_admin(password) {
                Ok(Grant {
                    role: Role::Admin,
                    scope: AccessScope::All,
                })
            } else {
                Err(BoothError::InvalidCredentials(
                    "Invalid admin password".to_string(),
                ))
            }
        }
        Some(Role::Vendor) => vendor_grant(secrets, store, password, attempt.event_id).await,
        None => Err(BoothError::BadRequest("Invalid role specified".to_string())),
    }
}

async fn vendor_grant(
    secrets: &LoginSecrets,
    store: &dyn EventSecretStore,
    password: &SubmittedPassword,
    event_id: Option<&serde_json::Value>,
) -> Result<Grant, BoothError> {
    // Evaluate both so timing does not reveal which secret matched
    let admin_match = secrets.is_admin(password);
    let vendor_match = secrets.is_vendor(password);
    if admin_match | vendor_match {
        return Ok(Grant {
            role: Role::Vendor,
            scope: AccessScope::All,
        });
    }

    let invalid = || BoothError::InvalidCredentials("Invalid vendor password".to_string());

    let Some(event_id) = parse_event_id(event_id)? else {
        return Err(invalid());
    };

    match store.vendor_password(event_id).await? {
        Some(expected) if password.matches(&expected) => {
            Ok(Grant {
                role: Role::Vendor,
                scope: AccessScope::Event(event_id),
            })
        }
        _ => Err(invalid()),
    }
}

/// `eventId` may arrive as a JSON integer or a numeric string; `null` means absent.
pub fn parse_event_id(value: Option<&serde_json::Value>) -> Result<Option<EventId>, BoothError> {
    let invalid = || BoothError::BadRequest("Invalid event id".to_string());

    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => n.as_i64().map(Some).ok_or_else(invalid),
        Some(serde_json::Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}
