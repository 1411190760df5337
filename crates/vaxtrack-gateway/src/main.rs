//! Vaxtrack Gateway - HTTP API for vaccination record tracking.
//!
//! This is the main entry point for the gateway service. Configuration
//! comes from the environment:
//!
//! - `LISTEN_ADDR` - listen address (default `0.0.0.0:8080`)
//! - `DATABASE_PATH` - `SQLite` database file (default `/data/vaxtrack/records.db`)
//! - `IDENTITY_BASE_URL` - identity provider API base URL
//! - `REGISTRY_BASE_URL` - profile registry API base URL

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vaxtrack_auth::{AuthConfig, HttpProfileRegistry, IdentityClient};
use vaxtrack_gateway::{create_router, GatewayConfig, GatewayState};
use vaxtrack_records::RecordService;
use vaxtrack_reminders::LocalScheduler;
use vaxtrack_store::{SqlStore, SqliteProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,vaxtrack=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Vaxtrack Gateway");

    // Load configuration from environment
    let listen_addr = std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());
    let database_path =
        std::env::var("DATABASE_PATH").unwrap_or_else(|_| "/data/vaxtrack/records.db".into());
    let identity_base_url = std::env::var("IDENTITY_BASE_URL")
        .unwrap_or_else(|_| AuthConfig::default().base_url);
    let registry_base_url = std::env::var("REGISTRY_BASE_URL")
        .unwrap_or_else(|_| "https://profiles.vaxtrack.app".into());

    tracing::info!(
        listen_addr = %listen_addr,
        database_path = %database_path,
        identity_base_url = %identity_base_url,
        registry_base_url = %registry_base_url,
        "Gateway configuration loaded"
    );

    // Open the record store; one connection per operation from here on.
    let provider = SqliteProvider::new(&database_path);
    let store = Arc::new(SqlStore::open(provider)?);
    let records = Arc::new(RecordService::new(store));

    // External collaborators.
    let identity = Arc::new(IdentityClient::new(AuthConfig {
        base_url: identity_base_url,
        ..AuthConfig::default()
    }));
    let profiles = Arc::new(HttpProfileRegistry::new(registry_base_url));
    let reminders = Arc::new(LocalScheduler::new());

    let config = GatewayConfig {
        listen_addr: listen_addr.clone(),
        ..GatewayConfig::default()
    };
    let state = GatewayState::new(records, identity, profiles, reminders, config);

    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
