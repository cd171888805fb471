//! Booth Service
//!
//! Entry point for the booth sales backend's authentication service.

use booth_service::config::Config;
use booth_service::observability::metrics::init_metrics_recorder;
use booth_service::repositories::{EventSecretStore, InMemoryEventSecrets, PgEventSecretStore};
use booth_service::routes::{self, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "booth_service=info,booth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Booth Service");

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        bind_address = %config.bind_address,
        jwt_algorithm = ?config.jwt_algorithm,
        jwt_access_expires_min = config.jwt_access_expires_min,
        jwt_issuer = %config.jwt_issuer,
        jwt_clock_skew_seconds = config.jwt_clock_skew.as_secs(),
        cookie_name = %config.cookie_name,
        event_passwords = config.event_vendor_passwords.len(),
        "Configuration loaded successfully"
    );

    let metrics_handle = init_metrics_recorder().map_err(|e| {
        error!("Failed to initialize metrics recorder: {}", e);
        e
    })?;

    let event_store: Arc<dyn EventSecretStore> = match &config.database_url {
        Some(database_url) => {
            info!("Connecting to database...");
            let db_url_with_timeout = add_query_timeout(database_url, 5);
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(10)
                .min_connections(1)
                .acquire_timeout(Duration::from_secs(5))
                .idle_timeout(Duration::from_secs(600))
                .max_lifetime(Duration::from_secs(1800))
                .connect(&db_url_with_timeout)
                .await
                .map_err(|e| {
                    error!("Failed to connect to database: {}", e);
                    e
                })?;
            info!("Database connection established");
            Arc::new(PgEventSecretStore::new(pool))
        }
        None => {
            info!("DATABASE_URL not set, using configured event passwords");
            Arc::new(InMemoryEventSecrets::new(config.event_vendor_passwords.clone()))
        }
    };

    let bind_address = config.bind_address.clone();
    let drain_seconds = config.drain_seconds;

    let state = Arc::new(AppState::new(config, event_store));
    let app = routes::build_routes(state, metrics_handle);

    let addr: SocketAddr = bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("Booth Service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(drain_seconds))
        .await?;

    info!("Booth Service shutdown complete");

    Ok(())
}

/// Returns once SIGTERM or SIGINT arrives and the drain period has elapsed.
async fn shutdown_signal(drain_seconds: u64) {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    if drain_seconds > 0 {
        warn!("Draining connections for {} seconds...", drain_seconds);
        tokio::time::sleep(Duration::from_secs(drain_seconds)).await;
        info!("Drain period complete");
    } else {
        info!("Skipping drain period (BOOTH_DRAIN_SECONDS=0)");
    }
}

/// Adds statement_timeout to the database URL.
fn add_query_timeout(url: &str, timeout_secs: u32) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}options=-c%20statement_timeout%3D{}s",
        url, separator, timeout_secs
    )
}
