//! Access guard for protected routes.
//!
//! A guard is parameterized by an [`AccessPolicy`] and attached at route
//! registration:
//!
//! ```rust,ignore
//! let guard = Arc::new(AccessGuard::new(validator, cookie_name, AccessPolicy::roles(&[Role::Admin])));
//! router.route_layer(middleware::from_fn_with_state(guard, require_access));
//! ```
//!
//! The credential is read from `Authorization: Bearer <token>`, falling back
//! to the session cookie. Decoded [`AccessClaims`] are inserted into request
//! extensions for handlers.

use crate::auth::claims::{AccessClaims, EventId, Role};
use crate::auth::cookie::read_cookie;
use crate::auth::validator::{TokenError, TokenValidator};
use crate::errors::BoothError;
use crate::observability::metrics::record_guard_decision;
use axum::{
    extract::{RawPathParams, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::instrument;

/// Route parameter compared against an event-scoped credential.
pub const EVENT_ID_PARAM: &str = "event_id";

/// Which credentials a guarded route accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    /// `None` (or empty) admits every role.
    pub allowed_roles: Option<Vec<Role>>,

    /// Narrow event-scoped vendor credentials to the route's `event_id`.
    pub require_event_match: bool,
}

impl AccessPolicy {
    pub fn new(allowed_roles: Option<Vec<Role>>, require_event_match: bool) -> Self {
        Self {
            allowed_roles,
            require_event_match,
        }
    }

    /// Any valid credential.
    pub fn any_role() -> Self {
        Self::default()
    }

    /// Only the listed roles.
    pub fn roles(roles: &[Role]) -> Self {
        Self::new(Some(roles.to_vec()), false)
    }

    pub fn with_event_match(mut self) -> Self {
        self.require_event_match = true;
        self
    }

    /// Whether `role` passes the role check.
    pub fn permits(&self, role: Role) -> bool {
        match &self.allowed_roles {
            Some(roles) if !roles.is_empty() => roles.contains(&role),
            _ => true,
        }
    }
}

/// Verifies the request credential and enforces an [`AccessPolicy`].
#[derive(Debug, Clone)]
pub struct AccessGuard {
    validator: Arc<TokenValidator>,
    cookie_name: String,
    policy: AccessPolicy,
}

impl AccessGuard {
    pub fn new(
        validator: Arc<TokenValidator>,
        cookie_name: impl Into<String>,
        policy: AccessPolicy,
    ) -> Self {
        Self {
            validator,
            cookie_name: cookie_name.into(),
            policy,
        }
    }

    /// Same validator and cookie, different policy.
    pub fn with_policy(&self, policy: AccessPolicy) -> Self {
        Self {
            validator: Arc::clone(&self.validator),
            cookie_name: self.cookie_name.clone(),
            policy,
        }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Decide whether a request with `headers` and route `event_param` may proceed.
    pub fn authorize(
        &self,
        headers: &HeaderMap,
        event_param: Option<&str>,
    ) -> Result<AccessClaims, BoothError> {
        self.authorize_at(headers, event_param, chrono::Utc::now().timestamp())
    }

    /// [`AccessGuard::authorize`] as of `now` (Unix epoch seconds).
    pub fn authorize_at(
        &self,
        headers: &HeaderMap,
        event_param: Option<&str>,
        now: i64,
    ) -> Result<AccessClaims, BoothError> {
        let result = self.decide(headers, event_param, now);
        record_guard_decision(outcome_label(&result));
        result
    }

    fn decide(
        &self,
        headers: &HeaderMap,
        event_param: Option<&str>,
        now: i64,
    ) -> Result<AccessClaims, BoothError> {
        let token = self.extract_token(headers).ok_or_else(|| {
            tracing::debug!(target: "booth.guard", "No credential in header or cookie");
            BoothError::from(TokenError::Missing)
        })?;

        let claims = self.validator.validate_at(token, now)?;

        if !self.policy.permits(claims.role) {
            tracing::debug!(target: "booth.guard", role = %claims.role, "Role not allowed on route");
            return Err(BoothError::InsufficientRole);
        }

        if self.policy.require_event_match {
            check_event_scope(&claims, event_param)?;
        }

        Ok(claims)
    }

    /// Bearer header first; an absent, empty, or non-Bearer header falls back to the cookie.
    fn extract_token<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        bearer_token(headers).or_else(|| {
            read_cookie(headers, &self.cookie_name).filter(|value| !value.is_empty())
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Event narrowing only applies to event-scoped vendor credentials.
fn check_event_scope(claims: &AccessClaims, event_param: Option<&str>) -> Result<(), BoothError> {
    if !claims.is_event_scoped_vendor() {
        return Ok(());
    }

    let raw = event_param.ok_or_else(|| {
        tracing::debug!(target: "booth.guard", "Route carries no event id");
        BoothError::InvalidEventContext("Missing event context".to_string())
    })?;

    let requested: EventId = raw.parse().map_err(|_| {
        tracing::debug!(target: "booth.guard", event_param = %raw, "Route event id is not an integer");
        BoothError::InvalidEventContext("Invalid event id".to_string())
    })?;

    if claims.bound_event_id() != Some(requested) {
        tracing::debug!(
            target: "booth.guard",
            requested = requested,
            bound = ?claims.event_id,
            "Credential not authorized for event"
        );
        return Err(BoothError::EventNotAuthorized);
    }

    Ok(())
}

fn outcome_label(result: &Result<AccessClaims, BoothError>) -> &'static str {
    match result {
        Ok(_) => "allowed",
        Err(BoothError::InsufficientRole) => "insufficient_role",
        Err(BoothError::EventNotAuthorized) => "event_not_authorized",
        Err(BoothError::InvalidEventContext(_)) => "invalid_event_context",
        Err(_) => "invalid_token",
    }
}

/// Guard middleware.
///
/// # Response
///
/// - 401 if the credential is missing or invalid
/// - 403 if the role or event scope does not match
/// - 400 if an event-scoped credential meets a route without a usable event id
/// - Otherwise continues with [`AccessClaims`] in extensions
#[instrument(skip_all, name = "booth.middleware.access")]
pub async fn require_access(
    State(guard): State<Arc<AccessGuard>>,
    path_params: Option<RawPathParams>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, BoothError> {
    let event_param = path_params.as_ref().and_then(|params| {
        params
            .iter()
            .find(|(key, _)| *key == EVENT_ID_PARAM)
            .map(|(_, value)| value)
    });

    let claims = guard.authorize(req.headers(), event_param)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::auth::claims::AccessScope;
    use crate::auth::{TokenIssuer, TokenSettings};
    use axum::{
        body::Body,
        http::{HeaderValue, Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Extension, Json, Router,
    };
    use common::secret::SecretString;
    use http_body_util::BodyExt;
    use jsonwebtoken::Algorithm;
    use std::time::Duration;
    use tower::ServiceExt;

    const SECRET: &str = "guard-test-secret-0123456789abcdefgh";
    const COOKIE: &str = "access_token";

    fn settings() -> Arc<TokenSettings> {
        Arc::new(TokenSettings::new(
            SecretString::from(SECRET),
            Algorithm::HS256,
            120,
            "booth-service",
            Duration::ZERO,
        ))
    }

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(settings())
    }

    fn guard(policy: AccessPolicy) -> AccessGuard {
        AccessGuard::new(Arc::new(TokenValidator::new(settings())), COOKIE, policy)
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    fn token(role: Role, scope: AccessScope) -> String {
        issuer().issue(role, scope).unwrap()
    }

    // -------------------------------------------------------------------------
    // authorize
    // -------------------------------------------------------------------------

    #[test]
    fn test_missing_credential_is_invalid_token() {
        let err = guard(AccessPolicy::any_role())
            .authorize(&HeaderMap::new(), None)
            .unwrap_err();
        assert!(matches!(err, BoothError::InvalidToken));
    }

    #[test]
    fn test_admin_only_rejects_vendor() {
        let g = guard(AccessPolicy::roles(&[Role::Admin]));

        let vendor = bearer(&token(Role::Vendor, AccessScope::All));
        assert!(matches!(
            g.authorize(&vendor, None).unwrap_err(),
            BoothError::InsufficientRole
        ));

        let admin = bearer(&token(Role::Admin, AccessScope::All));
        assert_eq!(g.authorize(&admin, None).unwrap().role, Role::Admin);
    }

    #[test]
    fn test_empty_role_list_admits_everyone() {
        let g = guard(AccessPolicy::new(Some(vec![]), false));
        let vendor = bearer(&token(Role::Vendor, AccessScope::Event(1)));

        assert!(g.authorize(&vendor, None).is_ok());
    }

    #[test]
    fn test_event_scope_matching() {
        let g = guard(AccessPolicy::roles(&[Role::Admin, Role::Vendor]).with_event_match());
        let headers = bearer(&token(Role::Vendor, AccessScope::Event(7)));

        assert!(g.authorize(&headers, Some("7")).is_ok());
        assert!(matches!(
            g.authorize(&headers, Some("8")).unwrap_err(),
            BoothError::EventNotAuthorized
        ));
        match g.authorize(&headers, Some("abc")).unwrap_err() {
            BoothError::InvalidEventContext(msg) => assert_eq!(msg, "Invalid event id"),
            other => panic!("unexpected error: {:?}", other),
        }
        match g.authorize(&headers, None).unwrap_err() {
            BoothError::InvalidEventContext(msg) => assert_eq!(msg, "Missing event context"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_all_scoped_vendor_bypasses_event_match() {
        let g = guard(AccessPolicy::any_role().with_event_match());
        let headers = bearer(&token(Role::Vendor, AccessScope::All));

        assert!(g.authorize(&headers, Some("8")).is_ok());
        assert!(g.authorize(&headers, Some("abc")).is_ok());
        assert!(g.authorize(&headers, None).is_ok());
    }

    #[test]
    fn test_admin_bypasses_event_match() {
        let g = guard(AccessPolicy::any_role().with_event_match());
        let headers = bearer(&token(Role::Admin, AccessScope::All));

        assert!(g.authorize(&headers, Some("99")).is_ok());
    }

    #[test]
    fn test_event_check_skipped_without_requirement() {
        let g = guard(AccessPolicy::any_role());
        let headers = bearer(&token(Role::Vendor, AccessScope::Event(7)));

        assert!(g.authorize(&headers, Some("8")).is_ok());
    }

    #[test]
    fn test_role_checked_before_event() {
        let g = guard(AccessPolicy::roles(&[Role::Admin]).with_event_match());
        let headers = bearer(&token(Role::Vendor, AccessScope::Event(7)));

        assert!(matches!(
            g.authorize(&headers, Some("abc")).unwrap_err(),
            BoothError::InsufficientRole
        ));
    }

    #[test]
    fn test_expired_credential_rejected() {
        let issued = issuer()
            .issue_at(Role::Admin, AccessScope::All, 1_700_000_000)
            .unwrap();
        let g = guard(AccessPolicy::any_role());

        assert!(g
            .authorize_at(&bearer(&issued), None, 1_700_000_000 + 60)
            .is_ok());
        assert!(matches!(
            g.authorize_at(&bearer(&issued), None, 1_700_000_000 + 7200)
                .unwrap_err(),
            BoothError::InvalidToken
        ));
    }

    #[test]
    fn test_cookie_fallback() {
        let g = guard(AccessPolicy::any_role());
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!(
                "{}={}",
                COOKIE,
                token(Role::Vendor, AccessScope::All)
            ))
            .unwrap(),
        );

        assert_eq!(g.authorize(&headers, None).unwrap().role, Role::Vendor);
    }

    #[test]
    fn test_non_bearer_header_falls_back_to_cookie() {
        let g = guard(AccessPolicy::any_role());
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!(
                "{}={}",
                COOKIE,
                token(Role::Admin, AccessScope::All)
            ))
            .unwrap(),
        );

        assert_eq!(g.authorize(&headers, None).unwrap().role, Role::Admin);
    }

    #[test]
    fn test_header_takes_precedence_over_cookie() {
        let g = guard(AccessPolicy::any_role());
        let mut headers = bearer("not-a-valid-token");
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!(
                "{}={}",
                COOKIE,
                token(Role::Admin, AccessScope::All)
            ))
            .unwrap(),
        );

        assert!(matches!(
            g.authorize(&headers, None).unwrap_err(),
            BoothError::InvalidToken
        ));
    }

    #[test]
    fn test_with_policy_keeps_validator() {
        let base = guard(AccessPolicy::any_role());
        let admin_only = base.with_policy(AccessPolicy::roles(&[Role::Admin]));

        assert_eq!(admin_only.policy(), &AccessPolicy::roles(&[Role::Admin]));
        let headers = bearer(&token(Role::Admin, AccessScope::All));
        assert!(admin_only.authorize(&headers, None).is_ok());
    }

    // -------------------------------------------------------------------------
    // require_access over HTTP
    // -------------------------------------------------------------------------

    async fn echo_claims(Extension(claims): Extension<AccessClaims>) -> Json<AccessClaims> {
        Json(claims)
    }

    fn app(policy: AccessPolicy) -> Router {
        let g = Arc::new(guard(policy));
        Router::new()
            .route("/events/:event_id/session", get(echo_claims))
            .route("/session", get(echo_claims))
            .route_layer(middleware::from_fn_with_state(g, require_access))
    }

    async fn send(router: Router, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut builder = HttpRequest::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let response = router
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_middleware_rejects_missing_credential() {
        let (status, body) = send(app(AccessPolicy::any_role()), "/session", None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn test_middleware_injects_claims() {
        let tok = token(Role::Vendor, AccessScope::Event(7));
        let (status, body) = send(
            app(AccessPolicy::any_role().with_event_match()),
            "/events/7/session",
            Some(&tok),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "vendor");
        assert_eq!(body["event_id"], 7);
    }

    #[tokio::test]
    async fn test_middleware_reads_event_path_param() {
        let tok = token(Role::Vendor, AccessScope::Event(7));
        let policy = AccessPolicy::any_role().with_event_match();

        let (status, body) = send(app(policy.clone()), "/events/8/session", Some(&tok)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "EVENT_NOT_AUTHORIZED");

        let (status, body) = send(app(policy.clone()), "/events/abc/session", Some(&tok)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Invalid event id");

        let (status, body) = send(app(policy), "/session", Some(&tok)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Missing event context");
    }

    #[tokio::test]
    async fn test_middleware_role_rejection() {
        let tok = token(Role::Vendor, AccessScope::All);
        let (status, body) = send(app(AccessPolicy::roles(&[Role::Admin])), "/session", Some(&tok)).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "INSUFFICIENT_ROLE");
    }
}
