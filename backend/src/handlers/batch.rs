//! HTTP handlers for receiving and processing endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use shared::types::ApiResponse;

use crate::error::AppResult;
use crate::middleware::{check_permission, CurrentUser};
use crate::models::{Action, Batch, BatchStatus, Resource};
use crate::services::batch::{CompleteProcessingInput, ReceiveBatchInput};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSelection {
    pub recipe_id: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: BatchStatus,
}

/// Receive a delivery from a farm
pub async fn receive_batch(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<ReceiveBatchInput>,
) -> AppResult<Json<ApiResponse<Batch>>> {
    check_permission(&user, Resource::Receiving, Action::Create)?;
    let batch = state.batches(&user).receive_batch(input).await?;
    Ok(Json(ApiResponse::ok(batch)))
}

/// List batches, newest first
pub async fn list_batches(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Batch>>>> {
    check_permission(&user, Resource::Processing, Action::View)?;
    let batches = state.batches(&user).list_batches().await?;
    Ok(Json(ApiResponse::ok(batches)))
}

pub async fn get_batch(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(batch_id): Path<String>,
) -> AppResult<Json<ApiResponse<Batch>>> {
    check_permission(&user, Resource::Processing, Action::View)?;
    let batch = state.batches(&user).get_batch(&batch_id).await?;
    Ok(Json(ApiResponse::ok(batch)))
}

pub async fn start_processing(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(batch_id): Path<String>,
    Json(input): Json<RecipeSelection>,
) -> AppResult<Json<ApiResponse<Batch>>> {
    check_permission(&user, Resource::Processing, Action::Edit)?;
    let batch = state
        .batches(&user)
        .start_processing(&batch_id, &input.recipe_id)
        .await?;
    Ok(Json(ApiResponse::ok(batch)))
}

pub async fn switch_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(batch_id): Path<String>,
    Json(input): Json<RecipeSelection>,
) -> AppResult<Json<ApiResponse<Batch>>> {
    check_permission(&user, Resource::Processing, Action::Edit)?;
    let batch = state
        .batches(&user)
        .switch_recipe(&batch_id, &input.recipe_id)
        .await?;
    Ok(Json(ApiResponse::ok(batch)))
}

pub async fn complete_processing(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(batch_id): Path<String>,
    Json(input): Json<CompleteProcessingInput>,
) -> AppResult<Json<ApiResponse<Batch>>> {
    check_permission(&user, Resource::Processing, Action::Edit)?;
    let batch = state
        .batches(&user)
        .complete_processing(&batch_id, input)
        .await?;
    Ok(Json(ApiResponse::ok(batch)))
}

pub async fn advance_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(batch_id): Path<String>,
    Json(input): Json<StatusUpdate>,
) -> AppResult<Json<ApiResponse<Batch>>> {
    check_permission(&user, Resource::Processing, Action::Edit)?;
    let batch = state
        .batches(&user)
        .advance_status(&batch_id, input.status)
        .await?;
    Ok(Json(ApiResponse::ok(batch)))
}
