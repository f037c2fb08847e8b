//! Fixtures shared by the service tests

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use shroomtrack_backend::config::PackingConfig;
use shroomtrack_backend::models::{
    Batch, InventoryItem, ItemSubtype, ItemType, RateSettings, Recipe, RecipeType,
};
use shroomtrack_backend::services::batch::{CompleteProcessingInput, ReceiveBatchInput};
use shroomtrack_backend::services::inventory::AddInventoryItemInput;
use shroomtrack_backend::services::recipe::CreateRecipeInput;
use shroomtrack_backend::services::{
    BatchService, InventoryService, LedgerService, PackingService, RecipeService,
};
use shroomtrack_backend::store::{DocumentStore, MemoryStore};

pub const WORKSPACE: &str = "ws-test";

// Helper to create Decimal from string
pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn store() -> Arc<dyn DocumentStore> {
    Arc::new(MemoryStore::new())
}

/// 2024-03-`day` at `hour`:00 UTC
pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

pub fn batches(store: &Arc<dyn DocumentStore>) -> BatchService {
    BatchService::new(store.clone(), WORKSPACE, RateSettings::default())
}

pub fn packing(store: &Arc<dyn DocumentStore>, require_packaging_stock: bool) -> PackingService {
    PackingService::new(
        store.clone(),
        WORKSPACE,
        &PackingConfig {
            require_packaging_stock,
        },
    )
}

pub fn ledger(store: &Arc<dyn DocumentStore>) -> LedgerService {
    LedgerService::new(store.clone(), WORKSPACE)
}

pub fn inventory(store: &Arc<dyn DocumentStore>) -> InventoryService {
    InventoryService::new(store.clone(), WORKSPACE)
}

pub async fn create_recipe(store: &Arc<dyn DocumentStore>, name: &str) -> Recipe {
    RecipeService::new(store.clone(), WORKSPACE)
        .create_recipe(CreateRecipeInput {
            id: None,
            name: name.to_string(),
            recipe_type: RecipeType::Chips,
            base_weight_kg: dec("0.5"),
            cook_time_minutes: 15,
            temperature: None,
            notes: None,
            image_url: Some("https://img.example.com/chips.png".to_string()),
            yield_ratio: None,
            default_pack_size_kg: None,
        })
        .await
        .unwrap()
}

pub async fn receive(
    store: &Arc<dyn DocumentStore>,
    id: &str,
    received: DateTime<Utc>,
    raw_kg: &str,
) -> Batch {
    batches(store)
        .receive_batch(ReceiveBatchInput {
            id: Some(id.to_string()),
            source_farm: "Hillside Farm".to_string(),
            raw_weight_kg: dec(raw_kg),
            spoiled_weight_kg: Decimal::ZERO,
            date_received: Some(received),
            quality_notes: None,
            storage_location: None,
        })
        .await
        .unwrap()
}

/// Receive a batch and run it through processing with no wastage
pub async fn dried_batch(
    store: &Arc<dyn DocumentStore>,
    id: &str,
    received: DateTime<Utc>,
    net_kg: &str,
    recipe: &Recipe,
) -> Batch {
    let service = batches(store);
    let batch = receive(store, id, received, net_kg).await;
    service.start_processing(&batch.id, &recipe.id).await.unwrap();
    service
        .complete_processing(
            &batch.id,
            CompleteProcessingInput {
                good_weight_kg: batch.net_weight_kg,
                wastage_kg: Decimal::ZERO,
                wastage_reason: None,
                completed_at: None,
            },
        )
        .await
        .unwrap()
}

pub async fn stock_item(
    store: &Arc<dyn DocumentStore>,
    name: &str,
    item_type: ItemType,
    subtype: ItemSubtype,
    quantity: i64,
    pack_price: &str,
    pack_size: i64,
) -> InventoryItem {
    inventory(store)
        .add_inventory_item(AddInventoryItemInput {
            id: None,
            name: name.to_string(),
            item_type,
            subtype: Some(subtype),
            quantity,
            threshold: 10,
            unit: "pcs".to_string(),
            unit_cost: dec(pack_price),
            supplier: Some("Pack & Co".to_string()),
            pack_size: Some(pack_size),
        })
        .await
        .unwrap()
}

/// Tins at 10.00 per pack of 100 and stickers at 5.00 per pack of 100
pub async fn stock_tin_supplies(store: &Arc<dyn DocumentStore>, quantity: i64) {
    stock_item(store, "Tin 250g", ItemType::Packaging, ItemSubtype::Tin, quantity, "10.00", 100).await;
    stock_item(store, "Brand Sticker", ItemType::Label, ItemSubtype::Sticker, quantity, "5.00", 100).await;
}
