//! Per-workspace cost rates

use std::sync::Arc;

use rust_decimal::Decimal;
use shared::validation::validate_rate;

use crate::error::{AppError, AppResult};
use crate::models::RateSettings;
use crate::store::{DocumentStore, Repository, RATE_SETTINGS_ID};

/// Rate provider for receiving and processing costs
#[derive(Clone)]
pub struct SettingsService {
    settings: Repository<RateSettings>,
    defaults: RateSettings,
}

impl SettingsService {
    /// `defaults` apply until the workspace stores its own rates
    pub fn new(store: Arc<dyn DocumentStore>, workspace: &str, defaults: RateSettings) -> Self {
        Self {
            settings: Repository::new(store, workspace),
            defaults,
        }
    }

    pub async fn rates(&self) -> AppResult<RateSettings> {
        Ok(self
            .settings
            .get(RATE_SETTINGS_ID)
            .await?
            .unwrap_or_else(|| self.defaults.clone()))
    }

    pub async fn set_labor_rate(&self, rate: Decimal) -> AppResult<RateSettings> {
        validate_rate(rate).map_err(|msg| AppError::validation("laborRatePerHour", msg))?;
        let mut rates = self.rates().await?;
        rates.labor_rate_per_hour = rate;
        self.settings.put(&rates).await?;
        tracing::info!("Labor rate set to {}", rate);
        Ok(rates)
    }

    pub async fn set_raw_material_rate(&self, rate: Decimal) -> AppResult<RateSettings> {
        validate_rate(rate).map_err(|msg| AppError::validation("rawMaterialRatePerKg", msg))?;
        let mut rates = self.rates().await?;
        rates.raw_material_rate_per_kg = rate;
        self.settings.put(&rates).await?;
        tracing::info!("Raw material rate set to {}", rate);
        Ok(rates)
    }
}
