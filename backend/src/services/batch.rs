//! Batch receiving and processing service
//!
//! Covers the batch lifecycle up to DRYING_COMPLETE. Each costed step
//! appends a ledger row: receiving records the raw material cost, completion
//! records labor and wastage.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use shared::types::generate_id;
use shared::validation::{
    validate_qc_reconciliation, validate_receiving_weights, validate_wastage_reason,
};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{Batch, BatchStatus, CostEntry, RateSettings};
use crate::services::{LedgerService, RecipeService, SettingsService};
use crate::store::{DocumentStore, Repository};

#[derive(Clone)]
pub struct BatchService {
    batches: Repository<Batch>,
    recipes: RecipeService,
    ledger: LedgerService,
    settings: SettingsService,
}

/// Input for receiving a delivery
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveBatchInput {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Source farm is required"))]
    pub source_farm: String,
    pub raw_weight_kg: Decimal,
    #[serde(default)]
    pub spoiled_weight_kg: Decimal,
    pub date_received: Option<DateTime<Utc>>,
    pub quality_notes: Option<String>,
    pub storage_location: Option<String>,
}

/// Input for finishing a processing run
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteProcessingInput {
    pub good_weight_kg: Decimal,
    #[serde(default)]
    pub wastage_kg: Decimal,
    pub wastage_reason: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl BatchService {
    pub fn new(store: Arc<dyn DocumentStore>, workspace: &str, default_rates: RateSettings) -> Self {
        Self {
            batches: Repository::new(store.clone(), workspace),
            recipes: RecipeService::new(store.clone(), workspace),
            ledger: LedgerService::new(store.clone(), workspace),
            settings: SettingsService::new(store, workspace, default_rates),
        }
    }

    // ========================================================================
    // Receiving
    // ========================================================================

    /// Record a delivery and its raw material cost
    pub async fn receive_batch(&self, input: ReceiveBatchInput) -> AppResult<Batch> {
        input.validate()?;
        validate_receiving_weights(input.raw_weight_kg, input.spoiled_weight_kg)
            .map_err(|msg| AppError::validation("rawWeightKg", msg))?;

        let id = input.id.unwrap_or_else(|| generate_id("BATCH"));
        if self.batches.get(&id).await?.is_some() {
            return Err(AppError::ValidationError(format!("Batch {} already exists", id)));
        }

        let mut batch = Batch::received(
            id,
            input.source_farm.trim().to_string(),
            input.date_received.unwrap_or_else(Utc::now),
            input.raw_weight_kg,
            input.spoiled_weight_kg,
        );
        batch.quality_notes = input.quality_notes;
        batch.storage_location = input.storage_location;
        self.batches.put(&batch).await?;

        let rates = self.settings.rates().await?;
        let raw_cost = batch.raw_weight_kg * rates.raw_material_rate_per_kg;
        self.ledger
            .record_transaction(
                &batch.id,
                batch.date_received.date_naive(),
                CostEntry::raw_material(raw_cost, batch.raw_weight_kg),
            )
            .await?;

        tracing::info!(
            "Received batch {} from {}: {}kg raw, {}kg net",
            batch.id,
            batch.source_farm,
            batch.raw_weight_kg,
            batch.net_weight_kg
        );
        Ok(batch)
    }

    // ========================================================================
    // Processing
    // ========================================================================

    /// Begin processing a received batch with a recipe's timers
    pub async fn start_processing(&self, batch_id: &str, recipe_id: &str) -> AppResult<Batch> {
        let recipe = self.recipes.get_recipe(recipe_id).await?;
        let now = Utc::now();

        let batch = self
            .batches
            .update(batch_id, |batch| {
                if batch.status != BatchStatus::Received {
                    return Err(AppError::InvalidStateTransition(format!(
                        "Batch {} is {}; only received batches can start processing",
                        batch.id, batch.status
                    )));
                }
                batch.process_config = Some(recipe.process_config(batch.net_weight_kg, now));
                batch.selected_recipe_id = Some(recipe.id.clone());
                batch.selected_recipe_name = Some(recipe.name.clone());
                batch.status = BatchStatus::Processing;
                Ok(())
            })
            .await?;

        tracing::info!("Batch {} processing as {}", batch.id, recipe.name);
        Ok(batch)
    }

    /// Swap the recipe of a running batch; only the cook stage is recalculated
    pub async fn switch_recipe(&self, batch_id: &str, recipe_id: &str) -> AppResult<Batch> {
        let recipe = self.recipes.get_recipe(recipe_id).await?;

        let batch = self
            .batches
            .update(batch_id, |batch| {
                if batch.status != BatchStatus::Processing {
                    return Err(AppError::InvalidStateTransition(format!(
                        "Batch {} is not processing",
                        batch.id
                    )));
                }
                let cook = recipe.cook_duration_seconds(batch.net_weight_kg);
                batch.process_config = Some(match &batch.process_config {
                    Some(config) => config.with_cook_duration(cook),
                    None => recipe.process_config(batch.net_weight_kg, Utc::now()),
                });
                batch.selected_recipe_id = Some(recipe.id.clone());
                batch.selected_recipe_name = Some(recipe.name.clone());
                Ok(())
            })
            .await?;

        tracing::info!("Batch {} switched to {}", batch.id, recipe.name);
        Ok(batch)
    }

    /// Finish processing: reconcile weights, record labor and wastage
    pub async fn complete_processing(
        &self,
        batch_id: &str,
        input: CompleteProcessingInput,
    ) -> AppResult<Batch> {
        let mut batch = self.batches.require(batch_id).await?;
        if batch.status != BatchStatus::Processing {
            return Err(AppError::InvalidStateTransition(format!(
                "Batch {} is {}; only processing batches can be completed",
                batch.id, batch.status
            )));
        }

        validate_qc_reconciliation(batch.remaining_weight_kg, input.good_weight_kg, input.wastage_kg)
            .map_err(|msg| {
                AppError::ValidationError(format!(
                    "{} (input {}kg, good {}kg, wastage {}kg)",
                    msg, batch.remaining_weight_kg, input.good_weight_kg, input.wastage_kg
                ))
            })?;
        validate_wastage_reason(input.wastage_kg, input.wastage_reason.as_deref())
            .map_err(|msg| AppError::validation("wastageReason", msg))?;

        let completed_at = input.completed_at.unwrap_or_else(Utc::now);
        let hours = batch
            .process_config
            .as_ref()
            .map(|config| config.elapsed_hours(completed_at))
            .unwrap_or(Decimal::ZERO)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        batch.status = BatchStatus::DryingComplete;
        batch.processing_wastage_kg = Some(input.wastage_kg);
        batch.wastage_reason = input.wastage_reason.filter(|r| !r.trim().is_empty());
        batch.remaining_weight_kg = (batch.net_weight_kg - input.wastage_kg).max(Decimal::ZERO);
        self.batches.put(&batch).await?;

        let rates = self.settings.rates().await?;
        self.ledger
            .record_transaction(
                &batch.id,
                completed_at.date_naive(),
                CostEntry::processing(
                    hours * rates.labor_rate_per_hour,
                    input.wastage_kg * rates.raw_material_rate_per_kg,
                    hours,
                ),
            )
            .await?;

        tracing::info!(
            "Batch {} drying complete after {}h, {}kg wasted",
            batch.id,
            hours,
            input.wastage_kg
        );
        Ok(batch)
    }

    /// Manual forward move, e.g. PACKED → STORED → SOLD
    ///
    /// PROCESSING and DRYING_COMPLETE are only reachable through
    /// [`BatchService::start_processing`] and [`BatchService::complete_processing`].
    pub async fn advance_status(&self, batch_id: &str, status: BatchStatus) -> AppResult<Batch> {
        let now = Utc::now();
        let batch = self
            .batches
            .update(batch_id, |batch| {
                if matches!(status, BatchStatus::Processing | BatchStatus::DryingComplete) {
                    return Err(AppError::InvalidStateTransition(format!(
                        "{} is set by the processing workflow",
                        status
                    )));
                }
                if !batch.status.can_transition_to(status) {
                    return Err(AppError::InvalidStateTransition(format!(
                        "Cannot move batch {} from {} to {}",
                        batch.id, batch.status, status
                    )));
                }
                if status == BatchStatus::Packed && batch.packed_date.is_none() {
                    batch.packed_date = Some(now);
                }
                batch.status = status;
                Ok(())
            })
            .await?;

        tracing::info!("Batch {} moved to {}", batch.id, batch.status);
        Ok(batch)
    }

    /// All batches, newest received first
    pub async fn list_batches(&self) -> AppResult<Vec<Batch>> {
        let mut batches = self.batches.list().await?;
        batches.sort_by(|a, b| b.date_received.cmp(&a.date_received));
        Ok(batches)
    }

    pub async fn get_batch(&self, id: &str) -> AppResult<Batch> {
        self.batches.require(id).await
    }
}
