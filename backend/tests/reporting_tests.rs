//! Reporting and sync tests
//!
//! Tests for derived figures and the sheet mirror including:
//! - Financial summary from ledger, sales and lots
//! - Dashboard overview counts
//! - Snapshot application replaces only the collections it carries

mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use common::*;
use rust_decimal::Decimal;
use shroomtrack_backend::external::DatabaseSnapshot;
use shroomtrack_backend::models::{
    Batch, BatchStatus, CostEntry, CostTransaction, ItemSubtype, ItemType, PackagingType,
    PaymentMethod, SalesStatus,
};
use shroomtrack_backend::services::packing::PackRecipeInput;
use shroomtrack_backend::services::reporting::PACKING_HISTORY_LIMIT;
use shroomtrack_backend::services::sales::CreateSaleInput;
use shroomtrack_backend::services::{ReportingService, SalesService, SyncService};
use shroomtrack_backend::store::DocumentStore;

const CHIPS: &str = "Crispy Mushroom Chips";

fn reporting(store: &Arc<dyn DocumentStore>) -> ReportingService {
    ReportingService::new(store.clone(), WORKSPACE)
}

fn pack(weight: &str, units: i64, day: u32, hour: u32) -> PackRecipeInput {
    PackRecipeInput {
        recipe_name: CHIPS.to_string(),
        total_weight_kg: dec(weight),
        total_units: units,
        packaging_type: PackagingType::Tin,
        packed_at: Some(at(day, hour)),
    }
}

/// 100kg received, 10 tins packed, 4 sold and delivered at 20.00
async fn trading_store() -> Arc<dyn DocumentStore> {
    let store = store();
    let recipe = create_recipe(&store, CHIPS).await;
    dried_batch(&store, "B-1", at(1, 8), "100", &recipe).await;
    stock_tin_supplies(&store, 100).await;
    packing(&store, false)
        .pack_recipe(pack("2", 10, 10, 9))
        .await
        .unwrap();

    let sales = SalesService::new(store.clone(), WORKSPACE);
    let sale = sales
        .create_sale(CreateSaleInput {
            customer_id: "CUST-1".to_string(),
            recipe_name: CHIPS.to_string(),
            packaging_type: PackagingType::Tin,
            quantity: 4,
            unit_price: dec("20.00"),
            payment_method: PaymentMethod::Cod,
            created_at: Some(at(12, 14)),
        })
        .await
        .unwrap();
    sales
        .update_sale_status(&sale.id, SalesStatus::Delivered)
        .await
        .unwrap();
    store
}

// ============================================================================
// Financial Summary
// ============================================================================

#[tokio::test]
async fn test_financial_summary_combines_costs_and_revenue() {
    let store = trading_store().await;
    let today = NaiveDate::from_ymd_opt(2024, 3, 12).unwrap();

    let summary = reporting(&store).financial_summary(today).await.unwrap();

    assert_eq!(summary.totals.raw_material, dec("800.00"));
    assert_eq!(summary.totals.packaging, dec("1.50"));
    assert_eq!(summary.totals.total, dec("801.50"));
    assert_eq!(summary.delivered_revenue, dec("80.00"));
    assert_eq!(summary.net_profit, dec("-721.50"));
    assert_eq!(summary.units_produced, 10);
    assert_eq!(summary.average_cost_per_unit, dec("80.15"));

    let last = summary.weekly_revenue.last().unwrap();
    assert_eq!(last.date, today);
    assert_eq!(last.revenue, dec("80.00"));
}

#[tokio::test]
async fn test_undelivered_sales_earn_no_revenue() {
    let store = store();
    let today = NaiveDate::from_ymd_opt(2024, 3, 12).unwrap();

    let revenue = reporting(&store).weekly_revenue(today).await.unwrap();

    assert_eq!(revenue.len(), 7);
    assert!(revenue.iter().all(|d| d.revenue == Decimal::ZERO));
}

// ============================================================================
// Dashboard
// ============================================================================

#[tokio::test]
async fn test_overview_counts() {
    let store = trading_store().await;
    receive(&store, "B-2", at(2, 8), "20").await;
    stock_item(&store, "Kraft Pouch", ItemType::Packaging, ItemSubtype::Pouch, 3, "4.00", 50).await;

    let overview = reporting(&store).overview().await.unwrap();

    let count = |status: BatchStatus| {
        overview
            .batch_counts
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.count)
            .unwrap()
    };
    assert_eq!(count(BatchStatus::Received), 1);
    assert_eq!(count(BatchStatus::DryingComplete), 1);
    assert_eq!(overview.ready_to_pack, 1);
    assert_eq!(overview.finished_units_on_hand, 6);
    assert_eq!(overview.total_net_weight_received_kg, dec("120"));
    assert_eq!(overview.low_stock_count, 1);
}

#[tokio::test]
async fn test_packing_history_is_newest_first_and_capped() {
    let store = store();
    let recipe = create_recipe(&store, CHIPS).await;
    dried_batch(&store, "B-1", at(1, 8), "20", &recipe).await;
    let service = packing(&store, false);
    for hour in 0..12 {
        service.pack_recipe(pack("0.5", 2, 10, hour)).await.unwrap();
    }

    let history = reporting(&store).packing_history().await.unwrap();

    assert_eq!(history.len(), PACKING_HISTORY_LIMIT);
    assert_eq!(history[0].date_packed, at(10, 11));
    assert!(history.windows(2).all(|w| w[0].date_packed >= w[1].date_packed));
}

// ============================================================================
// Sheet Sync
// ============================================================================

#[tokio::test]
async fn test_sync_is_disabled_without_script_url() {
    let store = store();
    let err = SyncService::new(store, WORKSPACE, None)
        .push_full_database()
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_snapshot_replaces_only_present_collections() {
    let store = trading_store().await;
    let sync = SyncService::new(store.clone(), WORKSPACE, None);

    let incoming = Batch::received(
        "B-SHEET".to_string(),
        "Valley Farm".to_string(),
        at(5, 8),
        dec("30"),
        Decimal::ZERO,
    );
    sync.apply_snapshot(&DatabaseSnapshot {
        batches: Some(vec![incoming]),
        ..DatabaseSnapshot::default()
    })
    .await
    .unwrap();

    let snapshot = sync.snapshot().await.unwrap();
    let batches = snapshot.batches.unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].id, "B-SHEET");
    assert_eq!(snapshot.inventory.unwrap().len(), 2);
    assert_eq!(snapshot.finished_goods.unwrap().len(), 1);
}

#[tokio::test]
async fn test_pulled_cost_rows_get_totals_recomputed() {
    let store = store();
    let sync = SyncService::new(store.clone(), WORKSPACE, None);

    let mut row = CostTransaction::new(
        "COST-SHEET".to_string(),
        "B-SHEET".to_string(),
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        CostEntry::packaging(dec("10")),
    );
    row.total_cost = dec("999");
    sync.apply_snapshot(&DatabaseSnapshot {
        daily_costs: Some(vec![row]),
        ..DatabaseSnapshot::default()
    })
    .await
    .unwrap();

    let rows = ledger(&store).list_transactions().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].packaging_cost, dec("10"));
    assert_eq!(rows[0].total_cost, dec("10"));
    assert_eq!(ledger(&store).totals().await.unwrap().total, dec("10"));
}
