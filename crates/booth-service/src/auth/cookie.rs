//! Session cookie handling.
//!
//! The access token is mirrored into an `HttpOnly` cookie at login so that
//! browser clients never touch it from script.

use crate::config::Config;
use axum::http::{header, HeaderMap};
use std::fmt;
use std::str::FromStr;

/// `SameSite` attribute of the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SameSite {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(SameSite::Strict),
            "lax" => Ok(SameSite::Lax),
            "none" => Ok(SameSite::None),
            other => Err(format!("unknown SameSite value '{}'", other)),
        }
    }
}

/// Attributes used when setting or clearing the session cookie.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub secure: bool,
    pub same_site: SameSite,
    pub max_age_seconds: i64,
}

impl CookieSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            name: config.cookie_name.clone(),
            secure: config.cookie_secure,
            same_site: config.cookie_same_site,
            max_age_seconds: config.jwt_access_expires_min.saturating_mul(60),
        }
    }

    /// `Set-Cookie` value carrying a freshly issued token.
    pub fn build_set_cookie(&self, token: &str) -> String {
        self.render(token, self.max_age_seconds)
    }

    /// `Set-Cookie` value that makes the browser drop the session cookie.
    pub fn build_clear_cookie(&self) -> String {
        self.render("", 0)
    }

    fn render(&self, value: &str, max_age: i64) -> String {
        let mut cookie = format!(
            "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite={}",
            self.name, value, max_age, self.same_site
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Find the value of the named cookie across all `Cookie` headers.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
}
