//! Google Apps Script client for the spreadsheet mirror
//!
//! The script exposes a single URL: `GET ?action=...` for reads and a JSON
//! `POST { action, payload }` for writes. Every response is wrapped as
//! `{ success, data?, message? }`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{Batch, CostTransaction, FinishedGoodLot, InventoryItem};

/// Whole-database snapshot exchanged with the sheet
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batches: Option<Vec<Batch>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Vec<InventoryItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_goods: Option<Vec<FinishedGoodLot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_costs: Option<Vec<CostTransaction>>,
}

/// Upcoming harvest announced by a farm
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HarvestAlert {
    pub id: String,
    pub farm_name: String,
    pub species: String,
    pub estimated_weight_kg: Decimal,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct ScriptRequest<'a, T: Serialize> {
    action: &'a str,
    payload: T,
}

#[derive(Debug, Deserialize)]
struct ScriptResponse<T> {
    success: bool,
    data: Option<T>,
    message: Option<String>,
}

/// Apps Script API client
#[derive(Clone)]
pub struct SheetClient {
    client: Client,
    script_url: String,
}

impl SheetClient {
    pub fn new(script_url: String, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, script_url })
    }

    /// Upload the full snapshot
    pub async fn push_full_database(&self, snapshot: &DatabaseSnapshot) -> AppResult<()> {
        self.post("SYNC_FULL_DB", snapshot).await
    }

    /// Download the full snapshot
    pub async fn pull_full_database(&self) -> AppResult<DatabaseSnapshot> {
        Ok(self.get::<DatabaseSnapshot>("GET_FULL_DB").await?.unwrap_or_default())
    }

    pub async fn check_harvest_alerts(&self) -> AppResult<Vec<HarvestAlert>> {
        Ok(self.get::<Vec<HarvestAlert>>("CHECK_ALERTS").await?.unwrap_or_default())
    }

    pub async fn clear_harvest_alert(&self, id: &str) -> AppResult<()> {
        self.post("CLEAR_ALERT", serde_json::json!({ "id": id })).await
    }

    async fn get<T: DeserializeOwned>(&self, action: &str) -> AppResult<Option<T>> {
        let response = self
            .client
            .get(&self.script_url)
            .query(&[("action", action)])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Sheet request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Sheet API error: {} - {}",
                status, body
            )));
        }

        let body: ScriptResponse<T> = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse sheet response: {}", e)))?;

        if !body.success {
            return Err(AppError::ExternalService(
                body.message.unwrap_or_else(|| format!("{} failed", action)),
            ));
        }
        Ok(body.data)
    }

    async fn post<T: Serialize>(&self, action: &str, payload: T) -> AppResult<()> {
        let response = self
            .client
            .post(&self.script_url)
            .json(&ScriptRequest { action, payload })
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Sheet request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Sheet API error: {} - {}",
                status, body
            )));
        }
        Ok(())
    }
}
