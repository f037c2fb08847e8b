//! Bulk spreadsheet sync
//!
//! The sheet is a mirror for operators, not a source of truth: a pull simply
//! overwrites whichever collections the sheet returns.

use std::sync::Arc;

use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::external::{DatabaseSnapshot, HarvestAlert, SheetClient};
use crate::models::{Batch, CostTransaction, FinishedGoodLot, InventoryItem};
use crate::store::{DocumentStore, Repository};

#[derive(Clone)]
pub struct SyncService {
    client: Option<SheetClient>,
    batches: Repository<Batch>,
    inventory: Repository<InventoryItem>,
    lots: Repository<FinishedGoodLot>,
    transactions: Repository<CostTransaction>,
}

/// Record counts moved by a sync
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub batches: usize,
    pub inventory: usize,
    pub finished_goods: usize,
    pub daily_costs: usize,
}

impl SyncSummary {
    fn of(snapshot: &DatabaseSnapshot) -> Self {
        Self {
            batches: snapshot.batches.as_ref().map_or(0, Vec::len),
            inventory: snapshot.inventory.as_ref().map_or(0, Vec::len),
            finished_goods: snapshot.finished_goods.as_ref().map_or(0, Vec::len),
            daily_costs: snapshot.daily_costs.as_ref().map_or(0, Vec::len),
        }
    }
}

impl SyncService {
    /// `client` is `None` when no script URL is configured
    pub fn new(store: Arc<dyn DocumentStore>, workspace: &str, client: Option<SheetClient>) -> Self {
        Self {
            client,
            batches: Repository::new(store.clone(), workspace),
            inventory: Repository::new(store.clone(), workspace),
            lots: Repository::new(store.clone(), workspace),
            transactions: Repository::new(store, workspace),
        }
    }

    fn client(&self) -> AppResult<&SheetClient> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::ValidationError("No API URL configured".into()))
    }

    /// Current workspace contents in sheet shape
    pub async fn snapshot(&self) -> AppResult<DatabaseSnapshot> {
        Ok(DatabaseSnapshot {
            batches: Some(self.batches.list().await?),
            inventory: Some(self.inventory.list().await?),
            finished_goods: Some(self.lots.list().await?),
            daily_costs: Some(self.transactions.list().await?),
        })
    }

    pub async fn push_full_database(&self) -> AppResult<SyncSummary> {
        let client = self.client()?;
        let snapshot = self.snapshot().await?;
        client.push_full_database(&snapshot).await?;

        let summary = SyncSummary::of(&snapshot);
        tracing::info!("Pushed snapshot to sheet: {:?}", summary);
        Ok(summary)
    }

    pub async fn pull_full_database(&self) -> AppResult<SyncSummary> {
        let snapshot = self.client()?.pull_full_database().await?;
        self.apply_snapshot(&snapshot).await?;

        let summary = SyncSummary::of(&snapshot);
        tracing::info!("Pulled snapshot from sheet: {:?}", summary);
        Ok(summary)
    }

    /// Replace each collection present in `snapshot`; absent ones are untouched
    pub async fn apply_snapshot(&self, snapshot: &DatabaseSnapshot) -> AppResult<()> {
        if let Some(batches) = &snapshot.batches {
            self.batches.replace_all(batches).await?;
        }
        if let Some(items) = &snapshot.inventory {
            self.inventory.replace_all(items).await?;
        }
        if let Some(lots) = &snapshot.finished_goods {
            self.lots.replace_all(lots).await?;
        }
        if let Some(transactions) = &snapshot.daily_costs {
            // Totals from the sheet are not trusted
            let transactions: Vec<CostTransaction> = transactions
                .iter()
                .cloned()
                .map(|mut tx| {
                    tx.recompute_total();
                    tx
                })
                .collect();
            self.transactions.replace_all(&transactions).await?;
        }
        Ok(())
    }

    pub async fn check_harvest_alerts(&self) -> AppResult<Vec<HarvestAlert>> {
        self.client()?.check_harvest_alerts().await
    }

    pub async fn clear_harvest_alert(&self, id: &str) -> AppResult<()> {
        self.client()?.clear_harvest_alert(id).await?;
        tracing::info!("Cleared harvest alert {}", id);
        Ok(())
    }
}
