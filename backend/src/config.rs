//! Configuration management for the ShroomTrack server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with SHROOM_ prefix

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::models::RateSettings;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// Default cost rates for new workspaces
    pub rates: RatesConfig,

    /// Packing behaviour
    pub packing: PackingConfig,

    /// Spreadsheet sync endpoint
    pub sheet: SheetConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL; empty runs against the in-memory store
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

impl DatabaseConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for verifying JWT tokens
    pub secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RatesConfig {
    pub labor_rate_per_hour: Decimal,
    pub raw_material_rate_per_kg: Decimal,
}

impl From<&RatesConfig> for RateSettings {
    fn from(rates: &RatesConfig) -> Self {
        Self {
            labor_rate_per_hour: rates.labor_rate_per_hour,
            raw_material_rate_per_kg: rates.raw_material_rate_per_kg,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PackingConfig {
    /// Refuse to pack when containers or labels are short
    pub require_packaging_stock: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SheetConfig {
    /// Apps Script web app URL; sync is disabled when empty
    pub script_url: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("SHROOM_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("jwt.secret", "development-secret-key")?
            .set_default("rates.labor_rate_per_hour", "12.50")?
            .set_default("rates.raw_material_rate_per_kg", "8.00")?
            .set_default("packing.require_packaging_stock", false)?
            .set_default("sheet.script_url", "")?
            .set_default("sheet.timeout_seconds", 30)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (SHROOM_ prefix)
            .add_source(
                Environment::with_prefix("SHROOM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Configuration for tests and local tooling: in-memory store, default rates
    pub fn for_tests() -> Self {
        Self {
            environment: "test".to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 1,
                min_connections: 1,
            },
            jwt: JwtConfig {
                secret: "test-secret".to_string(),
            },
            rates: RatesConfig {
                labor_rate_per_hour: RateSettings::default().labor_rate_per_hour,
                raw_material_rate_per_kg: RateSettings::default().raw_material_rate_per_kg,
            },
            packing: PackingConfig::default(),
            sheet: SheetConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
