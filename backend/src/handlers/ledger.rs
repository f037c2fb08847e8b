//! HTTP handlers for the cost ledger

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::costing::{CostShare, CostTotals};
use shared::types::ApiResponse;

use crate::error::AppResult;
use crate::middleware::{check_permission, CurrentUser};
use crate::models::{Action, CostTransaction, CostTransactionPatch, Resource};
use crate::services::ledger::RecordTransactionInput;
use crate::services::ReportingService;
use crate::AppState;

#[derive(Deserialize)]
pub struct LedgerQuery {
    pub format: Option<String>, // "json" or "csv"
}

/// List ledger rows, newest first; `?format=csv` downloads them
pub async fn list_transactions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<LedgerQuery>,
) -> AppResult<impl IntoResponse> {
    check_permission(&user, Resource::Ledger, Action::View)?;
    let transactions = state.ledger(&user).list_transactions().await?;

    if query.format.as_deref() == Some("csv") {
        let csv = ReportingService::export_to_csv(&transactions)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"cost_ledger.csv\"",
                ),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(ApiResponse::ok(transactions)).into_response())
    }
}

/// Record a manual ledger row
pub async fn record_transaction(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<RecordTransactionInput>,
) -> AppResult<Json<ApiResponse<CostTransaction>>> {
    check_permission(&user, Resource::Ledger, Action::Create)?;
    let transaction = state
        .ledger(&user)
        .record_transaction(&input.reference_id, input.date, input.entry)
        .await?;
    Ok(Json(ApiResponse::ok(transaction)))
}

/// Correct a ledger row
pub async fn update_transaction(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(transaction_id): Path<String>,
    Json(patch): Json<CostTransactionPatch>,
) -> AppResult<Json<ApiResponse<CostTransaction>>> {
    check_permission(&user, Resource::Ledger, Action::Edit)?;
    let transaction = state
        .ledger(&user)
        .update_transaction(&transaction_id, &patch)
        .await?;
    Ok(Json(ApiResponse::ok(transaction)))
}

pub async fn get_totals(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<CostTotals>>> {
    check_permission(&user, Resource::Ledger, Action::View)?;
    let totals = state.ledger(&user).totals().await?;
    Ok(Json(ApiResponse::ok(totals)))
}

pub async fn get_breakdown(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<CostShare>>>> {
    check_permission(&user, Resource::Ledger, Action::View)?;
    let breakdown = state.ledger(&user).breakdown().await?;
    Ok(Json(ApiResponse::ok(breakdown)))
}
