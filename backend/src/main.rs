//! ShroomTrack - Backend Server
//!
//! Serves the operations ledger API for receiving, processing, packing,
//! sales and cost tracking.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shroomtrack_backend::{
    create_app,
    store::{DocumentStore, MemoryStore, PgDocumentStore},
    AppState, Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "shroomtrack_server=debug,shroomtrack_backend=debug,tower_http=debug,sqlx=warn"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load().context("Failed to load configuration")?;

    tracing::info!("Starting ShroomTrack server");
    tracing::info!("Environment: {}", config.environment);
    if config.packing.require_packaging_stock {
        tracing::info!("Packing requires packaging stock");
    }

    let store: Arc<dyn DocumentStore> = if config.database.is_configured() {
        tracing::info!("Connecting to database...");
        let db_pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .min_connections(config.database.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&config.database.url)
            .await?;
        tracing::info!("Database connection established");

        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");

        Arc::new(PgDocumentStore::new(db_pool))
    } else {
        tracing::warn!("No database URL configured; using in-memory store");
        Arc::new(MemoryStore::new())
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState::new(store, config)?;
    if state.sheet.is_none() {
        tracing::info!("Sheet sync disabled (no script URL)");
    }

    let app = create_app(state);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
