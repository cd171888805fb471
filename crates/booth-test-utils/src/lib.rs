//! # Booth Test Utilities
//!
//! Shared test utilities for the booth service.
//!
//! This crate provides:
//! - Deterministic fixtures (secrets, passwords, event ids, config vars)
//! - `TestTokenBuilder` for signing arbitrary, possibly invalid, tokens
//! - `TokenAssertions` for inspecting issued tokens
//! - `TestBoothServer` for E2E tests over a real listener
//!
//! ## Usage
//!
//! ```rust,ignore
//! use booth_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let server = TestBoothServer::spawn().await?;
//!     let token = server.login("admin", ADMIN_PASSWORD, None).await?;
//!
//!     let response = reqwest::Client::new()
//!         .get(format!("{}/api/admin/session", server.url()))
//!         .bearer_auth(&token)
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod crypto_fixtures;
pub mod server_harness;
pub mod token_builders;

pub use assertions::*;
pub use crypto_fixtures::*;
pub use server_harness::*;
pub use token_builders::*;
