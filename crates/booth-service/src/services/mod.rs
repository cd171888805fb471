//! Business logic behind the HTTP handlers.

pub mod login_service;
