//! Secret types for protecting sensitive values from accidental logging.
//!
//! This module re-exports types from the [`secrecy`] crate. Use these types
//! for passwords, signing secrets, and bearer tokens.
//!
//! `SecretString` implements `Debug` with redaction, so any struct deriving
//! `Debug` that holds one gets safe logging behavior for free. Secrets are
//! zeroized when dropped.
//!
//! # Example
//!
//! ```rust
//! use common::secret::SecretString;
//! use secrecy::ExposeSecret;
//!
//! #[derive(Debug)]
//! struct LoginRequest {
//!     role: String,
//!     password: SecretString,  // Safe: Debug shows "[REDACTED]"
//! }
//!
//! let req = LoginRequest {
//!     role: "vendor".to_string(),
//!     password: SecretString::from("hunter2"),
//! };
//!
//! println!("{:?}", req);
//!
//! let password: &str = req.password.expose_secret();
//! ```
//!
//! Use `SecretString` for:
//! - Admin and vendor passwords
//! - Per-event vendor passwords
//! - The token signing secret
//! - Bearer tokens

pub use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

/// Compare two secrets without short-circuiting on the first differing byte.
///
/// Length is not hidden; only the content comparison is constant-time.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_debug_is_redacted() {
        let secret = SecretString::from("hunter2");
        let debug_str = format!("{secret:?}");

        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("hunter2"));
    }

    #[test]
    fn test_expose_secret_returns_inner_value() {
        let secret = SecretString::from("password123");
        assert_eq!(secret.expose_secret(), "password123");
    }

    #[test]
    fn test_deserialize() {
        #[allow(dead_code)]
        #[derive(Debug, Deserialize)]
        struct Login {
            role: String,
            password: SecretString,
        }

        let json = r#"{"role": "vendor", "password": "my-secret-value"}"#;
        let login: Login = serde_json::from_str(json).expect("deserialize");

        assert_eq!(login.password.expose_secret(), "my-secret-value");

        let debug = format!("{login:?}");
        assert!(!debug.contains("my-secret-value"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_constant_time_eq_matches() {
        assert!(constant_time_eq(b"booth-secret", b"booth-secret"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_constant_time_eq_rejects_different_content() {
        assert!(!constant_time_eq(b"booth-secret", b"booth-secreT"));
    }

    #[test]
    fn test_constant_time_eq_rejects_different_length() {
        assert!(!constant_time_eq(b"short", b"shorter"));
        assert!(!constant_time_eq(b"", b"x"));
    }
}
