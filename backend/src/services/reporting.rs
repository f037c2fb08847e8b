//! Reporting service for dashboards, financial summaries and exports

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::costing::{financial_summary, weekly_revenue, DailyRevenue, FinancialSummary};

use crate::error::{AppError, AppResult};
use crate::models::{
    Batch, BatchStatus, CostTransaction, FinishedGoodLot, InventoryItem, SalesRecord,
};
use crate::store::{DocumentStore, Repository};

/// Number of lots shown in the packing history
pub const PACKING_HISTORY_LIMIT: usize = 10;

#[derive(Clone)]
pub struct ReportingService {
    batches: Repository<Batch>,
    lots: Repository<FinishedGoodLot>,
    inventory: Repository<InventoryItem>,
    transactions: Repository<CostTransaction>,
    sales: Repository<SalesRecord>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: BatchStatus,
    pub count: usize,
}

/// Operations dashboard overview
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub batch_counts: Vec<StatusCount>,
    pub ready_to_pack: usize,
    pub finished_units_on_hand: i64,
    pub total_net_weight_received_kg: Decimal,
    pub low_stock_count: usize,
}

impl ReportingService {
    pub fn new(store: Arc<dyn DocumentStore>, workspace: &str) -> Self {
        Self {
            batches: Repository::new(store.clone(), workspace),
            lots: Repository::new(store.clone(), workspace),
            inventory: Repository::new(store.clone(), workspace),
            transactions: Repository::new(store.clone(), workspace),
            sales: Repository::new(store, workspace),
        }
    }

    pub async fn overview(&self) -> AppResult<DashboardOverview> {
        let batches = self.batches.list().await?;
        let lots = self.lots.list().await?;
        let inventory = self.inventory.list().await?;

        let batch_counts = BatchStatus::ALL
            .iter()
            .map(|status| StatusCount {
                status: *status,
                count: batches.iter().filter(|b| b.status == *status).count(),
            })
            .collect();

        let ready_to_pack = batches
            .iter()
            .filter(|b| b.has_packable_weight())
            .count();

        Ok(DashboardOverview {
            batch_counts,
            ready_to_pack,
            finished_units_on_hand: lots.iter().map(|l| l.quantity).sum(),
            total_net_weight_received_kg: batches.iter().map(|b| b.net_weight_kg).sum(),
            low_stock_count: inventory.iter().filter(|i| i.is_low_stock()).count(),
        })
    }

    /// Costs, revenue and profitability as of `today`
    pub async fn financial_summary(&self, today: NaiveDate) -> AppResult<FinancialSummary> {
        let transactions = self.transactions.list().await?;
        let sales = self.sales.list().await?;
        let lots = self.lots.list().await?;
        Ok(financial_summary(&transactions, &sales, &lots, today))
    }

    pub async fn weekly_revenue(&self, today: NaiveDate) -> AppResult<Vec<DailyRevenue>> {
        Ok(weekly_revenue(&self.sales.list().await?, today))
    }

    /// Most recently packed lots
    pub async fn packing_history(&self) -> AppResult<Vec<FinishedGoodLot>> {
        let mut lots = self.lots.list().await?;
        lots.sort_by(|a, b| b.date_packed.cmp(&a.date_packed));
        lots.truncate(PACKING_HISTORY_LIMIT);
        Ok(lots)
    }

    /// Export data to CSV format
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("UTF-8 error: {}", e)))
    }
}
