//! Packing service: turns drying-complete batches into finished-good lots
//!
//! A packing run follows the plan from [`plan_fifo_allocation`] and then, for
//! each draw, consumes batch weight, creates a lot, consumes packaging supplies
//! and appends a packaging cost row. Steps are applied one after another;
//! a failure part-way leaves the earlier draws in place.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::allocation::{plan_fifo_allocation, BatchAvailability, WEIGHT_TOLERANCE_KG};
use shared::types::generate_id;

use crate::config::PackingConfig;
use crate::error::{AppError, AppResult};
use crate::models::{
    Batch, CostEntry, FinishedGoodLot, PackagingType, ProductKey, DEFAULT_SELLING_PRICE,
};
use crate::services::{InventoryService, LedgerService, RecipeService};
use crate::store::{DocumentStore, Repository};

#[derive(Clone)]
pub struct PackingService {
    batches: Repository<Batch>,
    lots: Repository<FinishedGoodLot>,
    inventory: InventoryService,
    ledger: LedgerService,
    recipes: RecipeService,
    require_packaging_stock: bool,
}

/// Input for a FIFO packing run across batches of one recipe
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackRecipeInput {
    pub recipe_name: String,
    pub total_weight_kg: Decimal,
    pub total_units: i64,
    pub packaging_type: PackagingType,
    pub packed_at: Option<DateTime<Utc>>,
}

/// Input for packing from a single batch
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackBatchInput {
    pub batch_id: String,
    pub weight_kg: Decimal,
    pub units: i64,
    pub packaging_type: PackagingType,
    /// Defaults to the batch's selected recipe
    pub recipe_name: Option<String>,
    pub packed_at: Option<DateTime<Utc>>,
}

impl PackingService {
    pub fn new(store: Arc<dyn DocumentStore>, workspace: &str, config: &PackingConfig) -> Self {
        Self {
            batches: Repository::new(store.clone(), workspace),
            lots: Repository::new(store.clone(), workspace),
            inventory: InventoryService::new(store.clone(), workspace),
            ledger: LedgerService::new(store.clone(), workspace),
            recipes: RecipeService::new(store, workspace),
            require_packaging_stock: config.require_packaging_stock,
        }
    }

    /// Pack `total_units` from `total_weight_kg` of a recipe, oldest batches first
    ///
    /// The returned lots' quantities always add up to `total_units`.
    pub async fn pack_recipe(&self, input: PackRecipeInput) -> AppResult<Vec<FinishedGoodLot>> {
        let batches = self.batches.list().await?;
        let candidates: Vec<BatchAvailability> = batches
            .iter()
            .filter(|b| b.is_packable_for(&input.recipe_name))
            .map(|b| BatchAvailability {
                batch_id: b.id.clone(),
                date_received: b.date_received,
                remaining_weight_kg: b.remaining_weight_kg,
            })
            .collect();

        let plan = plan_fifo_allocation(&candidates, input.total_weight_kg, input.total_units)
            .map_err(|e| match e {
                shared::allocation::AllocationError::NoCandidates => AppError::NotFound(format!(
                    "Batch ready for packing as {}",
                    input.recipe_name
                )),
                other => other.into(),
            })?;

        self.check_packaging_stock(input.packaging_type, input.total_units)
            .await?;

        let packed_at = input.packed_at.unwrap_or_else(Utc::now);
        let mut lots = Vec::with_capacity(plan.draws.len());
        for draw in &plan.draws {
            let lot = self
                .apply_draw(
                    &draw.batch_id,
                    draw.weight_kg,
                    draw.units,
                    input.packaging_type,
                    &input.recipe_name,
                    packed_at,
                )
                .await?;
            lots.extend(lot);
        }

        tracing::info!(
            "Packed {} units of {} ({}kg) into {} lot(s) from {} batch(es)",
            input.total_units,
            input.recipe_name,
            input.total_weight_kg,
            lots.len(),
            plan.draws.len()
        );
        Ok(lots)
    }

    /// Pack directly from one batch
    pub async fn pack_batch(&self, input: PackBatchInput) -> AppResult<FinishedGoodLot> {
        if input.weight_kg <= Decimal::ZERO {
            return Err(AppError::validation("weightKg", "Weight to pack must be positive"));
        }
        if input.units <= 0 {
            return Err(AppError::validation("units", "Unit count must be positive"));
        }

        let batch = self.batches.require(&input.batch_id).await?;
        let recipe_name = input
            .recipe_name
            .or_else(|| batch.selected_recipe_name.clone())
            .ok_or_else(|| AppError::validation("recipeName", "Batch has no recipe selected"))?;

        if !batch.has_packable_weight() {
            return Err(AppError::InvalidStateTransition(format!(
                "Batch {} is {} and cannot be packed",
                batch.id, batch.status
            )));
        }
        if input.weight_kg > batch.remaining_weight_kg + WEIGHT_TOLERANCE_KG {
            return Err(AppError::InsufficientStock {
                message: format!(
                    "Batch {} has {}kg remaining, {}kg requested",
                    batch.id, batch.remaining_weight_kg, input.weight_kg
                ),
                shortfall: input.weight_kg - batch.remaining_weight_kg,
            });
        }

        self.check_packaging_stock(input.packaging_type, input.units)
            .await?;

        let packed_at = input.packed_at.unwrap_or_else(Utc::now);
        let weight = input.weight_kg.min(batch.remaining_weight_kg);
        self.apply_draw(
            &batch.id,
            weight,
            input.units,
            input.packaging_type,
            &recipe_name,
            packed_at,
        )
        .await?
        .ok_or_else(|| AppError::Internal("Packing produced no lot".into()))
    }

    /// Finished-good lots, newest packed first
    pub async fn list_lots(&self) -> AppResult<Vec<FinishedGoodLot>> {
        let mut lots = self.lots.list().await?;
        lots.sort_by(|a, b| b.date_packed.cmp(&a.date_packed));
        Ok(lots)
    }

    /// Refuse the run up front when supplies are short and the workspace
    /// requires packaging stock
    async fn check_packaging_stock(&self, packaging: PackagingType, units: i64) -> AppResult<()> {
        if !self.require_packaging_stock {
            return Ok(());
        }

        let shortfalls = self.inventory.packaging_preflight(packaging, units).await?;
        if let Some(worst) = shortfalls.iter().max_by_key(|s| s.missing()) {
            let names: Vec<&str> = shortfalls.iter().map(|s| s.item_name.as_str()).collect();
            return Err(AppError::InsufficientStock {
                message: format!("Not enough packaging stock: {}", names.join(", ")),
                shortfall: Decimal::from(worst.missing()),
            });
        }
        Ok(())
    }

    /// Apply one draw. A zero-unit draw still consumes weight but emits no lot.
    async fn apply_draw(
        &self,
        batch_id: &str,
        weight_kg: Decimal,
        units: i64,
        packaging: PackagingType,
        recipe_name: &str,
        packed_at: DateTime<Utc>,
    ) -> AppResult<Option<FinishedGoodLot>> {
        let batch = self
            .batches
            .update(batch_id, |batch| {
                batch.consume(weight_kg, packed_at);
                Ok(())
            })
            .await?;

        if units == 0 {
            tracing::debug!(
                "Draw of {}kg from {} rounded to zero units; no lot created",
                weight_kg,
                batch.id
            );
            return Ok(None);
        }

        let lot = FinishedGoodLot {
            id: generate_id("FG"),
            batch_id: batch.id.clone(),
            recipe_name: recipe_name.to_string(),
            packaging_type: packaging,
            quantity: units,
            quantity_packed: units,
            date_packed: packed_at,
            selling_price: self
                .current_price(&ProductKey::new(recipe_name, packaging))
                .await?,
            image_url: self
                .recipes
                .find_by_name(recipe_name)
                .await?
                .and_then(|r| r.image_url),
        };
        self.lots.put(&lot).await?;

        let supplies = self.inventory.consume_packaging(packaging, units).await?;
        self.ledger
            .record_transaction(
                &batch.id,
                packed_at.date_naive(),
                CostEntry::packaging(supplies.cost),
            )
            .await?;

        tracing::debug!(
            "Lot {}: {} x {} from batch {} ({}kg)",
            lot.id,
            units,
            packaging,
            batch.id,
            weight_kg
        );
        Ok(Some(lot))
    }

    /// Price of the newest existing lot of a product, or the default
    async fn current_price(&self, product: &ProductKey) -> AppResult<Decimal> {
        Ok(self
            .lots
            .list()
            .await?
            .into_iter()
            .filter(|l| product.matches(l))
            .max_by_key(|l| l.date_packed)
            .map(|l| l.selling_price)
            .unwrap_or(DEFAULT_SELLING_PRICE))
    }
}
