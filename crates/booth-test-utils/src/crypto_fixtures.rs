//! Deterministic secrets and identifiers for tests.

use std::collections::HashMap;

/// Signing secret used by test servers and builders.
pub const TEST_JWT_SECRET: &str = "booth-test-signing-secret-0123456789abcdef";

/// A different secret of valid length, for forged-token tests.
pub const OTHER_JWT_SECRET: &str = "some-other-signing-secret-fedcba9876543210";

/// Issuer configured on test servers.
pub const TEST_ISSUER: &str = "booth-service";

pub const ADMIN_PASSWORD: &str = "test-admin-password";
pub const VENDOR_PASSWORD: &str = "test-vendor-password";

/// Event with a per-event vendor password.
pub const EVENT_ID: i64 = 3;
pub const EVENT_PASSWORD: &str = "event-three-password";

/// Second event with its own password.
pub const OTHER_EVENT_ID: i64 = 4;
pub const OTHER_EVENT_PASSWORD: &str = "event-four-password";

/// Environment variables for a complete test configuration.
///
/// Cookies are not `Secure` so plain-HTTP test clients keep them.
pub fn test_config_vars() -> HashMap<String, String> {
    HashMap::from([
        ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
        ("JWT_SECRET".to_string(), TEST_JWT_SECRET.to_string()),
        ("JWT_ISSUER".to_string(), TEST_ISSUER.to_string()),
        ("JWT_COOKIE_SECURE".to_string(), "false".to_string()),
        ("ADMIN_PASSWORD".to_string(), ADMIN_PASSWORD.to_string()),
        ("VENDOR_PASSWORD".to_string(), VENDOR_PASSWORD.to_string()),
        (
            "EVENT_VENDOR_PASSWORDS".to_string(),
            format!(
                "{}={},{}={}",
                EVENT_ID, EVENT_PASSWORD, OTHER_EVENT_ID, OTHER_EVENT_PASSWORD
            ),
        ),
    ])
}
