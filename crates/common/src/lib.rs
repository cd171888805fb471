//! Common utilities and types shared across booth components.

#![warn(clippy::pedantic)]

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for JWT utilities (size limit, clock skew, iat/exp checks)
pub mod jwt;
