//! HTTP handlers for packing endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::types::ApiResponse;

use crate::error::{AppError, AppResult};
use crate::middleware::{check_permission, CurrentUser};
use crate::models::{
    estimate_pack_count, Action, FinishedGoodLot, PackagingType, Resource, SupplyShortfall,
};
use crate::services::packing::{PackBatchInput, PackRecipeInput};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreflightQuery {
    pub packaging_type: PackagingType,
    pub units: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateQuery {
    pub weight_kg: Decimal,
    pub yield_ratio: Decimal,
    pub pack_size_kg: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse {
    pub units: i64,
}

/// Pack a recipe across batches, oldest first
pub async fn pack_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<PackRecipeInput>,
) -> AppResult<Json<ApiResponse<Vec<FinishedGoodLot>>>> {
    check_permission(&user, Resource::Packing, Action::Create)?;
    let lots = state.packing(&user).pack_recipe(input).await?;
    Ok(Json(ApiResponse::ok(lots)))
}

/// Pack from one batch
pub async fn pack_batch(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<PackBatchInput>,
) -> AppResult<Json<ApiResponse<FinishedGoodLot>>> {
    check_permission(&user, Resource::Packing, Action::Create)?;
    let lot = state.packing(&user).pack_batch(input).await?;
    Ok(Json(ApiResponse::ok(lot)))
}

/// Container and label shortfalls for a planned run
pub async fn packaging_preflight(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<PreflightQuery>,
) -> AppResult<Json<ApiResponse<Vec<SupplyShortfall>>>> {
    check_permission(&user, Resource::Packing, Action::View)?;
    if query.units <= 0 {
        return Err(AppError::validation("units", "Unit count must be positive"));
    }
    let shortfalls = state
        .inventory(&user)
        .packaging_preflight(query.packaging_type, query.units)
        .await?;
    Ok(Json(ApiResponse::ok(shortfalls)))
}

/// Units a weight of product should fill
pub async fn estimate_units(
    CurrentUser(user): CurrentUser,
    Query(query): Query<EstimateQuery>,
) -> AppResult<Json<ApiResponse<EstimateResponse>>> {
    check_permission(&user, Resource::Packing, Action::View)?;
    let units = estimate_pack_count(query.weight_kg, query.yield_ratio, query.pack_size_kg);
    Ok(Json(ApiResponse::ok(EstimateResponse { units })))
}

/// Finished-good lots, newest first
pub async fn list_lots(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<FinishedGoodLot>>>> {
    check_permission(&user, Resource::Packing, Action::View)?;
    let lots = state.packing(&user).list_lots().await?;
    Ok(Json(ApiResponse::ok(lots)))
}
