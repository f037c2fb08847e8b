//! Cost ledger service
//!
//! Append-only record of what each batch (or purchase order) has cost. Rows
//! are only ever changed through [`LedgerService::update_transaction`], which
//! recomputes the total.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use shared::costing::{cost_breakdown, CostShare, CostTotals};
use shared::types::generate_id;

use crate::error::AppResult;
use crate::models::{CostEntry, CostTransaction, CostTransactionPatch};
use crate::store::{DocumentStore, Repository};

#[derive(Clone)]
pub struct LedgerService {
    transactions: Repository<CostTransaction>,
}

/// Input for recording a manual ledger row
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordTransactionInput {
    pub reference_id: String,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub entry: CostEntry,
}

impl LedgerService {
    pub fn new(store: Arc<dyn DocumentStore>, workspace: &str) -> Self {
        Self {
            transactions: Repository::new(store, workspace),
        }
    }

    /// Append a ledger row for a business event
    pub async fn record_transaction(
        &self,
        reference_id: &str,
        date: NaiveDate,
        entry: CostEntry,
    ) -> AppResult<CostTransaction> {
        let sequence = self
            .transactions
            .list()
            .await?
            .iter()
            .map(|tx| tx.sequence)
            .max()
            .unwrap_or(0)
            + 1;
        let mut transaction =
            CostTransaction::new(generate_id("COST"), reference_id.to_string(), date, entry);
        transaction.sequence = sequence;
        self.transactions.put(&transaction).await?;

        tracing::debug!(
            "Recorded cost {} for {}: total {}",
            transaction.id,
            reference_id,
            transaction.total_cost
        );
        Ok(transaction)
    }

    /// Apply a manual correction. Reference and date never change.
    pub async fn update_transaction(
        &self,
        id: &str,
        patch: &CostTransactionPatch,
    ) -> AppResult<CostTransaction> {
        let transaction = self
            .transactions
            .update(id, |tx| {
                tx.apply(patch);
                Ok(())
            })
            .await?;
        tracing::info!("Updated cost transaction {}", id);
        Ok(transaction)
    }

    /// Ledger rows, newest first
    pub async fn list_transactions(&self) -> AppResult<Vec<CostTransaction>> {
        let mut transactions = self.transactions.list().await?;
        transactions.sort_by(CostTransaction::newest_first);
        Ok(transactions)
    }

    pub async fn transactions_for(&self, reference_id: &str) -> AppResult<Vec<CostTransaction>> {
        Ok(self
            .list_transactions()
            .await?
            .into_iter()
            .filter(|tx| tx.reference_id == reference_id)
            .collect())
    }

    pub async fn totals(&self) -> AppResult<CostTotals> {
        let transactions = self.transactions.list().await?;
        Ok(CostTotals::from_transactions(&transactions))
    }

    pub async fn breakdown(&self) -> AppResult<Vec<CostShare>> {
        Ok(cost_breakdown(&self.totals().await?))
    }
}
