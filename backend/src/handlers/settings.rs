//! HTTP handlers for workspace rate settings

use axum::{extract::State, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::types::ApiResponse;

use crate::error::AppResult;
use crate::middleware::{check_permission, CurrentUser};
use crate::models::{Action, RateSettings, Resource};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RateInput {
    pub rate: Decimal,
}

pub async fn get_rates(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<RateSettings>>> {
    check_permission(&user, Resource::Settings, Action::View)?;
    let rates = state.settings(&user).rates().await?;
    Ok(Json(ApiResponse::ok(rates)))
}

pub async fn set_labor_rate(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<RateInput>,
) -> AppResult<Json<ApiResponse<RateSettings>>> {
    check_permission(&user, Resource::Settings, Action::Edit)?;
    let rates = state.settings(&user).set_labor_rate(input.rate).await?;
    Ok(Json(ApiResponse::ok(rates)))
}

pub async fn set_raw_material_rate(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<RateInput>,
) -> AppResult<Json<ApiResponse<RateSettings>>> {
    check_permission(&user, Resource::Settings, Action::Edit)?;
    let rates = state
        .settings(&user)
        .set_raw_material_rate(input.rate)
        .await?;
    Ok(Json(ApiResponse::ok(rates)))
}
