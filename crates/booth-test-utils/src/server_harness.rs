//! Test server harness for E2E testing
//!
//! Provides `TestBoothServer` for spawning real booth service instances in tests.

use crate::crypto_fixtures::test_config_vars;
use booth_service::config::Config;
use booth_service::observability::metrics::build_recorder_builder;
use booth_service::repositories::InMemoryEventSecrets;
use booth_service::routes::{self, AppState};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Test harness for spawning the booth service in E2E tests.
///
/// Event passwords come from `EVENT_VENDOR_PASSWORDS`; no database is needed.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_health() -> Result<(), anyhow::Error> {
///     let server = TestBoothServer::spawn().await?;
///     let response = reqwest::get(format!("{}/health", server.url())).await?;
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestBoothServer {
    addr: SocketAddr,
    config: Config,
    _handle: JoinHandle<()>,
}

impl TestBoothServer {
    /// Spawn with the default test configuration.
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with(HashMap::new()).await
    }

    /// Spawn with `overrides` applied on top of the default test configuration.
    ///
    /// The server binds to a random available port (127.0.0.1:0).
    pub async fn spawn_with(overrides: HashMap<String, String>) -> Result<Self, anyhow::Error> {
        let mut vars = test_config_vars();
        vars.extend(overrides);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let store = InMemoryEventSecrets::new(config.event_vendor_passwords.clone());
        let state = Arc::new(AppState::new(config.clone(), Arc::new(store)));

        // A local recorder handle; installing the global recorder would fail
        // on the second server in the same process
        let metrics_handle = build_recorder_builder()
            .map_err(|e| anyhow::anyhow!("Failed to build metrics recorder: {}", e))?
            .build_recorder()
            .handle();

        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Log in and return the issued access token.
    pub async fn login(
        &self,
        role: &str,
        password: &str,
        event_id: Option<i64>,
    ) -> Result<String, anyhow::Error> {
        let response = reqwest::Client::new()
            .post(format!("{}/api/auth/login", self.url()))
            .json(&json!({ "role": role, "password": password, "eventId": event_id }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Login failed with status {}", status);
        }

        let body: serde_json::Value = response.json().await?;
        body["access_token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("Login response has no access_token"))
    }
}

impl Drop for TestBoothServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
