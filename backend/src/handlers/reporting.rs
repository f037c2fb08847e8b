//! HTTP handlers for dashboard and financial reports

use axum::{extract::State, Json};
use chrono::Utc;
use shared::costing::{DailyRevenue, FinancialSummary};
use shared::types::ApiResponse;

use crate::error::AppResult;
use crate::middleware::{check_permission, CurrentUser};
use crate::models::{Action, FinishedGoodLot, Resource};
use crate::services::reporting::DashboardOverview;
use crate::AppState;

/// Batch, stock and supply counts for the dashboard
pub async fn get_overview(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<DashboardOverview>>> {
    check_permission(&user, Resource::Report, Action::View)?;
    let overview = state.reporting(&user).overview().await?;
    Ok(Json(ApiResponse::ok(overview)))
}

/// Cost totals, revenue and profit as of today
pub async fn get_financial_summary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<FinancialSummary>>> {
    check_permission(&user, Resource::Report, Action::View)?;
    let today = Utc::now().date_naive();
    let summary = state.reporting(&user).financial_summary(today).await?;
    Ok(Json(ApiResponse::ok(summary)))
}

pub async fn get_weekly_revenue(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<DailyRevenue>>>> {
    check_permission(&user, Resource::Report, Action::View)?;
    let today = Utc::now().date_naive();
    let revenue = state.reporting(&user).weekly_revenue(today).await?;
    Ok(Json(ApiResponse::ok(revenue)))
}

pub async fn get_packing_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<FinishedGoodLot>>>> {
    check_permission(&user, Resource::Report, Action::View)?;
    let history = state.reporting(&user).packing_history().await?;
    Ok(Json(ApiResponse::ok(history)))
}
