//! Access token claims.
//!
//! The wire format mirrors what the login flow has always emitted:
//! `role`, `access`, `event_id`, `iat`, `exp`, `iss`. In-process code works
//! with [`AccessScope`], which cannot express an event-scoped token without
//! an event id.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a sales event.
pub type EventId = i64;

/// Coarse capability class carried by a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Vendor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Vendor => "vendor",
        }
    }

    /// Parse the role name submitted by a login request.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Role::Admin),
            "vendor" => Some(Role::Vendor),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire value of the `access` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    All,
    Event,
}

impl Access {
    pub fn as_str(&self) -> &'static str {
        match self {
            Access::All => "all",
            Access::Event => "event",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scope restriction of a token: every event, or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessScope {
    All,
    Event(EventId),
}

impl AccessScope {
    pub fn access(&self) -> Access {
        match self {
            AccessScope::All => Access::All,
            AccessScope::Event(_) => Access::Event,
        }
    }

    pub fn event_id(&self) -> Option<EventId> {
        match self {
            AccessScope::All => None,
            AccessScope::Event(id) => Some(*id),
        }
    }
}

/// Claims of a booth access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Capability class.
    pub role: Role,

    /// `all` or `event`.
    pub access: Access,

    /// Bound event; `null` unless `access` is `event`.
    #[serde(default)]
    pub event_id: Option<EventId>,

    /// Issued-at timestamp (Unix epoch seconds).
    pub iat: i64,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,

    /// Issuer constant of the minting service.
    pub iss: String,
}

impl AccessClaims {
    pub fn new(role: Role, scope: AccessScope, iat: i64, exp: i64, issuer: &str) -> Self {
        Self {
            role,
            access: scope.access(),
            event_id: scope.event_id(),
            iat,
            exp,
            iss: issuer.to_string(),
        }
    }

    /// Typed scope of the token.
    ///
    /// Returns `None` for an `event` token without an event id. An `all`
    /// token ignores whatever `event_id` it carries.
    pub fn scope(&self) -> Option<AccessScope> {
        match (self.access, self.event_id) {
            (Access::All, _) => Some(AccessScope::All),
            (Access::Event, Some(id)) => Some(AccessScope::Event(id)),
            (Access::Event, None) => None,
        }
    }

    /// Event id bound to the token, only for `event` tokens.
    pub fn bound_event_id(&self) -> Option<EventId> {
        self.scope().and_then(|scope| scope.event_id())
    }

    /// Whether per-event narrowing applies to this token.
    pub fn is_event_scoped_vendor(&self) -> bool {
        self.role == Role::Vendor && self.access == Access::Event
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("vendor"), Some(Role::Vendor));
        assert_eq!(Role::parse("Admin"), None);
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_claims_serialize_wire_format() {
        let claims = AccessClaims::new(
            Role::Vendor,
            AccessScope::Event(7),
            1_700_000_000,
            1_700_007_200,
            "booth-service",
        );

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["role"], "vendor");
        assert_eq!(json["access"], "event");
        assert_eq!(json["event_id"], 7);
        assert_eq!(json["iat"], 1_700_000_000);
        assert_eq!(json["exp"], 1_700_007_200);
        assert_eq!(json["iss"], "booth-service");
    }

    #[test]
    fn test_all_scope_serializes_null_event_id() {
        let claims = AccessClaims::new(Role::Admin, AccessScope::All, 0, 60, "booth-service");

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["access"], "all");
        assert!(json["event_id"].is_null());
    }

    #[test]
    fn test_missing_event_id_deserializes_as_none() {
        let json = r#"{"role":"admin","access":"all","iat":1,"exp":2,"iss":"booth-service"}"#;
        let claims: AccessClaims = serde_json::from_str(json).unwrap();

        assert_eq!(claims.event_id, None);
        assert_eq!(claims.scope(), Some(AccessScope::All));
    }

    #[test]
    fn test_unknown_role_fails_to_deserialize() {
        let json = r#"{"role":"root","access":"all","iat":1,"exp":2,"iss":"booth-service"}"#;
        assert!(serde_json::from_str::<AccessClaims>(json).is_err());
    }

    #[test]
    fn test_event_access_without_event_id_has_no_scope() {
        let json = r#"{"role":"vendor","access":"event","event_id":null,"iat":1,"exp":2,"iss":"booth-service"}"#;
        let claims: AccessClaims = serde_json::from_str(json).unwrap();

        assert_eq!(claims.scope(), None);
        assert_eq!(claims.bound_event_id(), None);
    }

    #[test]
    fn test_all_access_ignores_stray_event_id() {
        let json = r#"{"role":"vendor","access":"all","event_id":9,"iat":1,"exp":2,"iss":"booth-service"}"#;
        let claims: AccessClaims = serde_json::from_str(json).unwrap();

        assert_eq!(claims.scope(), Some(AccessScope::All));
        assert_eq!(claims.bound_event_id(), None);
        assert!(!claims.is_event_scoped_vendor());
    }

    #[test]
    fn test_is_event_scoped_vendor() {
        let vendor_event = AccessClaims::new(Role::Vendor, AccessScope::Event(3), 0, 60, "i");
        let vendor_all = AccessClaims::new(Role::Vendor, AccessScope::All, 0, 60, "i");
        let admin = AccessClaims::new(Role::Admin, AccessScope::All, 0, 60, "i");

        assert!(vendor_event.is_event_scoped_vendor());
        assert!(!vendor_all.is_event_scoped_vendor());
        assert!(!admin.is_event_scoped_vendor());
    }
}
