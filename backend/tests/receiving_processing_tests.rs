//! Receiving and processing tests
//!
//! Tests for the batch lifecycle up to drying complete including:
//! - Raw material cost recorded on receipt
//! - Recipe timers scaled to batch weight
//! - QC reconciliation and wastage costs on completion

mod common;

use std::sync::Arc;

use chrono::Duration;
use common::*;
use shroomtrack_backend::models::{Batch, BatchStatus, RateSettings, RecipeType};
use shroomtrack_backend::services::batch::{CompleteProcessingInput, ReceiveBatchInput};
use shroomtrack_backend::services::recipe::CreateRecipeInput;
use shroomtrack_backend::services::{RecipeService, SettingsService};
use shroomtrack_backend::store::DocumentStore;

fn delivery(id: &str, raw: &str, spoiled: &str) -> ReceiveBatchInput {
    ReceiveBatchInput {
        id: Some(id.to_string()),
        source_farm: "Hillside Farm".to_string(),
        raw_weight_kg: dec(raw),
        spoiled_weight_kg: dec(spoiled),
        date_received: Some(at(1, 8)),
        quality_notes: Some("Firm caps".to_string()),
        storage_location: Some("Cold room 2".to_string()),
    }
}

fn qc(good: &str, wastage: &str, reason: Option<&str>) -> CompleteProcessingInput {
    CompleteProcessingInput {
        good_weight_kg: dec(good),
        wastage_kg: dec(wastage),
        wastage_reason: reason.map(str::to_string),
        completed_at: None,
    }
}

async fn processing_batch(store: &Arc<dyn DocumentStore>) -> Batch {
    let recipe = create_recipe(store, "Crispy Mushroom Chips").await;
    let service = batches(store);
    service.receive_batch(delivery("B-1", "100", "5")).await.unwrap();
    service.start_processing("B-1", &recipe.id).await.unwrap()
}

// ============================================================================
// Receiving
// ============================================================================

#[tokio::test]
async fn test_receive_records_net_weight_and_raw_cost() {
    let store = store();
    let batch = batches(&store)
        .receive_batch(delivery("B-1", "100", "5"))
        .await
        .unwrap();

    assert_eq!(batch.status, BatchStatus::Received);
    assert_eq!(batch.net_weight_kg, dec("95"));
    assert_eq!(batch.remaining_weight_kg, dec("95"));
    assert_eq!(batch.storage_location.as_deref(), Some("Cold room 2"));

    let rows = ledger(&store).transactions_for("B-1").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].raw_material_cost, dec("800.00"));
    assert_eq!(rows[0].weight_processed, dec("100"));
    assert_eq!(rows[0].total_cost, dec("800.00"));
    assert_eq!(rows[0].date, at(1, 8).date_naive());
}

#[tokio::test]
async fn test_receive_uses_workspace_rate() {
    let store = store();
    SettingsService::new(store.clone(), WORKSPACE, RateSettings::default())
        .set_raw_material_rate(dec("10"))
        .await
        .unwrap();

    batches(&store)
        .receive_batch(delivery("B-1", "50", "0"))
        .await
        .unwrap();

    let totals = ledger(&store).totals().await.unwrap();
    assert_eq!(totals.raw_material, dec("500.00"));
}

#[tokio::test]
async fn test_spoiled_weight_cannot_exceed_raw() {
    let store = store();
    let err = batches(&store)
        .receive_batch(delivery("B-1", "10", "12"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
    assert!(ledger(&store).list_transactions().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_batch_id_is_rejected() {
    let store = store();
    let service = batches(&store);
    service.receive_batch(delivery("B-1", "10", "0")).await.unwrap();

    let err = service
        .receive_batch(delivery("B-1", "20", "0"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
    assert_eq!(service.get_batch("B-1").await.unwrap().raw_weight_kg, dec("10"));
}

// ============================================================================
// Processing
// ============================================================================

#[tokio::test]
async fn test_start_processing_scales_timers_to_net_weight() {
    let store = store();
    let batch = processing_batch(&store).await;

    assert_eq!(batch.status, BatchStatus::Processing);
    assert_eq!(batch.selected_recipe_name.as_deref(), Some("Crispy Mushroom Chips"));

    // 95kg at a 0.5kg base is 190 base units
    let config = batch.process_config.unwrap();
    assert_eq!(config.wash_duration_seconds, 190 * 60);
    assert_eq!(config.drain_duration_seconds, 120);
    assert_eq!(config.cook_duration_seconds, 190 * 15 * 60);
    assert_eq!(
        config.total_duration_seconds,
        config.wash_duration_seconds + config.drain_duration_seconds + config.cook_duration_seconds
    );
}

#[tokio::test]
async fn test_only_received_batches_start_processing() {
    let store = store();
    let batch = processing_batch(&store).await;
    let recipe_id = batch.selected_recipe_id.unwrap();

    let err = batches(&store)
        .start_processing("B-1", &recipe_id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_STATE_TRANSITION");
}

#[tokio::test]
async fn test_switch_recipe_recalculates_cook_only() {
    let store = store();
    let batch = processing_batch(&store).await;
    let before = batch.process_config.unwrap();

    let powder = RecipeService::new(store.clone(), WORKSPACE)
        .create_recipe(CreateRecipeInput {
            id: None,
            name: "Mushroom Powder".to_string(),
            recipe_type: RecipeType::Powder,
            base_weight_kg: dec("1"),
            cook_time_minutes: 10,
            temperature: None,
            notes: None,
            image_url: None,
            yield_ratio: None,
            default_pack_size_kg: None,
        })
        .await
        .unwrap();

    let switched = batches(&store).switch_recipe("B-1", &powder.id).await.unwrap();
    let after = switched.process_config.unwrap();

    assert_eq!(switched.selected_recipe_name.as_deref(), Some("Mushroom Powder"));
    assert_eq!(after.start_time, before.start_time);
    assert_eq!(after.wash_duration_seconds, before.wash_duration_seconds);
    assert_eq!(after.cook_duration_seconds, 95 * 10 * 60);
}

#[tokio::test]
async fn test_complete_processing_records_labor_and_wastage() {
    let store = store();
    let batch = processing_batch(&store).await;
    let started = batch.process_config.unwrap().start_time;

    let mut input = qc("90", "5", Some("Bruised caps"));
    input.completed_at = Some(started + Duration::hours(2));
    let done = batches(&store).complete_processing("B-1", input).await.unwrap();

    assert_eq!(done.status, BatchStatus::DryingComplete);
    assert_eq!(done.remaining_weight_kg, dec("90"));
    assert_eq!(done.processing_wastage_kg, Some(dec("5")));

    let totals = ledger(&store).totals().await.unwrap();
    assert_eq!(totals.labor, dec("25.00"));
    assert_eq!(totals.wastage, dec("40.00"));
    assert_eq!(
        totals.total,
        totals.raw_material + totals.packaging + totals.labor + totals.wastage
    );
}

#[tokio::test]
async fn test_qc_weights_must_reconcile() {
    let store = store();
    processing_batch(&store).await;

    let err = batches(&store)
        .complete_processing("B-1", qc("80", "5", Some("Bruised caps")))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "VALIDATION_ERROR");
    let batch = batches(&store).get_batch("B-1").await.unwrap();
    assert_eq!(batch.status, BatchStatus::Processing);
}

#[tokio::test]
async fn test_qc_within_tolerance_is_accepted() {
    let store = store();
    processing_batch(&store).await;

    let done = batches(&store)
        .complete_processing("B-1", qc("94.95", "0", None))
        .await
        .unwrap();
    assert_eq!(done.status, BatchStatus::DryingComplete);
}

#[tokio::test]
async fn test_wastage_requires_reason() {
    let store = store();
    processing_batch(&store).await;

    let err = batches(&store)
        .complete_processing("B-1", qc("90", "5", Some("  ")))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
}

// ============================================================================
// Status
// ============================================================================

#[tokio::test]
async fn test_advance_to_packed_stamps_date() {
    let store = store();
    processing_batch(&store).await;
    let service = batches(&store);
    service
        .complete_processing("B-1", qc("95", "0", None))
        .await
        .unwrap();

    let packed = service.advance_status("B-1", BatchStatus::Packed).await.unwrap();
    assert_eq!(packed.status, BatchStatus::Packed);
    assert!(packed.packed_date.is_some());

    let err = service
        .advance_status("B-1", BatchStatus::Received)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_STATE_TRANSITION");
}

#[tokio::test]
async fn test_workflow_statuses_cannot_be_set_by_hand() {
    let store = store();
    batches(&store)
        .receive_batch(delivery("B-1", "10", "0"))
        .await
        .unwrap();

    for status in [BatchStatus::Processing, BatchStatus::DryingComplete] {
        let err = batches(&store).advance_status("B-1", status).await.unwrap_err();
        assert_eq!(err.code(), "INVALID_STATE_TRANSITION");
    }
}

#[tokio::test]
async fn test_list_batches_newest_first() {
    let store = store();
    receive(&store, "B-OLD", at(1, 8), "10").await;
    receive(&store, "B-NEW", at(2, 8), "10").await;

    let listed = batches(&store).list_batches().await.unwrap();
    let ids: Vec<&str> = listed.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["B-NEW", "B-OLD"]);
}
