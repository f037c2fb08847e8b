//! HTTP handlers for spreadsheet sync

use axum::{
    extract::{Path, State},
    Json,
};
use shared::types::ApiResponse;

use crate::error::AppResult;
use crate::external::HarvestAlert;
use crate::middleware::{check_permission, CurrentUser};
use crate::models::{Action, Resource};
use crate::services::sync::SyncSummary;
use crate::AppState;

/// Upload the workspace to the sheet
pub async fn push(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<SyncSummary>>> {
    check_permission(&user, Resource::Sync, Action::Create)?;
    let summary = state.sync(&user).push_full_database().await?;
    Ok(Json(ApiResponse::ok_with_message(summary, "Pushed to sheet")))
}

/// Replace local collections with the sheet's copy
pub async fn pull(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<SyncSummary>>> {
    check_permission(&user, Resource::Sync, Action::Edit)?;
    let summary = state.sync(&user).pull_full_database().await?;
    Ok(Json(ApiResponse::ok_with_message(summary, "Pulled from sheet")))
}

pub async fn list_alerts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<HarvestAlert>>>> {
    check_permission(&user, Resource::Sync, Action::View)?;
    let alerts = state.sync(&user).check_harvest_alerts().await?;
    Ok(Json(ApiResponse::ok(alerts)))
}

pub async fn clear_alert(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(alert_id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    check_permission(&user, Resource::Sync, Action::Delete)?;
    state.sync(&user).clear_harvest_alert(&alert_id).await?;
    Ok(Json(ApiResponse::ok_with_message((), "Alert cleared")))
}
