//! ShroomTrack backend
//!
//! Operations ledger for a mushroom processing business: receiving,
//! processing, FIFO packing, sales, procurement and cost accounting.

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use config::Config;

use crate::error::AppResult;
use crate::external::SheetClient;
use crate::middleware::AuthUser;
use crate::models::RateSettings;
use crate::services::{
    BatchService, InventoryService, LedgerService, PackingService, ProcurementService,
    RecipeService, ReportingService, SalesService, SettingsService, SyncService,
};
use crate::store::DocumentStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: Arc<Config>,
    pub sheet: Option<SheetClient>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: Config) -> AppResult<Self> {
        let sheet = if config.sheet.script_url.trim().is_empty() {
            None
        } else {
            Some(SheetClient::new(
                config.sheet.script_url.clone(),
                Duration::from_secs(config.sheet.timeout_seconds.max(1)),
            )?)
        };

        Ok(Self {
            store,
            config: Arc::new(config),
            sheet,
        })
    }

    fn default_rates(&self) -> RateSettings {
        RateSettings::from(&self.config.rates)
    }

    pub fn batches(&self, user: &AuthUser) -> BatchService {
        BatchService::new(self.store.clone(), &user.workspace_id, self.default_rates())
    }

    pub fn packing(&self, user: &AuthUser) -> PackingService {
        PackingService::new(self.store.clone(), &user.workspace_id, &self.config.packing)
    }

    pub fn ledger(&self, user: &AuthUser) -> LedgerService {
        LedgerService::new(self.store.clone(), &user.workspace_id)
    }

    pub fn sales(&self, user: &AuthUser) -> SalesService {
        SalesService::new(self.store.clone(), &user.workspace_id)
    }

    pub fn inventory(&self, user: &AuthUser) -> InventoryService {
        InventoryService::new(self.store.clone(), &user.workspace_id)
    }

    pub fn procurement(&self, user: &AuthUser) -> ProcurementService {
        ProcurementService::new(self.store.clone(), &user.workspace_id)
    }

    pub fn recipes(&self, user: &AuthUser) -> RecipeService {
        RecipeService::new(self.store.clone(), &user.workspace_id)
    }

    pub fn settings(&self, user: &AuthUser) -> SettingsService {
        SettingsService::new(self.store.clone(), &user.workspace_id, self.default_rates())
    }

    pub fn reporting(&self, user: &AuthUser) -> ReportingService {
        ReportingService::new(self.store.clone(), &user.workspace_id)
    }

    pub fn sync(&self, user: &AuthUser) -> SyncService {
        SyncService::new(self.store.clone(), &user.workspace_id, self.sheet.clone())
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "ShroomTrack Operations API v1"
}
