//! HTTP handlers for supply inventory endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use shared::types::ApiResponse;

use crate::error::AppResult;
use crate::middleware::{check_permission, CurrentUser};
use crate::models::{Action, InventoryItem, Resource};
use crate::services::inventory::{AddInventoryItemInput, AdjustInventoryInput};
use crate::AppState;

/// Add a supply item (or refresh the supplier of a known one)
pub async fn add_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<AddInventoryItemInput>,
) -> AppResult<Json<ApiResponse<InventoryItem>>> {
    check_permission(&user, Resource::Inventory, Action::Create)?;
    let item = state.inventory(&user).add_inventory_item(input).await?;
    Ok(Json(ApiResponse::ok(item)))
}

pub async fn list_items(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<InventoryItem>>>> {
    check_permission(&user, Resource::Inventory, Action::View)?;
    let items = state.inventory(&user).list_items().await?;
    Ok(Json(ApiResponse::ok(items)))
}

pub async fn get_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(item_id): Path<String>,
) -> AppResult<Json<ApiResponse<InventoryItem>>> {
    check_permission(&user, Resource::Inventory, Action::View)?;
    let item = state.inventory(&user).get_item(&item_id).await?;
    Ok(Json(ApiResponse::ok(item)))
}

/// Manual stock adjustment
pub async fn adjust_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(item_id): Path<String>,
    Json(input): Json<AdjustInventoryInput>,
) -> AppResult<Json<ApiResponse<InventoryItem>>> {
    check_permission(&user, Resource::Inventory, Action::Edit)?;
    let item = state
        .inventory(&user)
        .adjust_inventory(&item_id, input.delta, input.unit_cost)
        .await?;
    Ok(Json(ApiResponse::ok(item)))
}

pub async fn low_stock_items(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<InventoryItem>>>> {
    check_permission(&user, Resource::Inventory, Action::View)?;
    let items = state.inventory(&user).low_stock_items().await?;
    Ok(Json(ApiResponse::ok(items)))
}
