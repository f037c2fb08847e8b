//! HTTP handlers for recipe endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use shared::types::ApiResponse;

use crate::error::AppResult;
use crate::middleware::{check_permission, CurrentUser};
use crate::models::{Action, Recipe, Resource};
use crate::services::recipe::CreateRecipeInput;
use crate::AppState;

pub async fn create_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateRecipeInput>,
) -> AppResult<Json<ApiResponse<Recipe>>> {
    check_permission(&user, Resource::Processing, Action::Create)?;
    let recipe = state.recipes(&user).create_recipe(input).await?;
    Ok(Json(ApiResponse::ok(recipe)))
}

pub async fn list_recipes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Recipe>>>> {
    check_permission(&user, Resource::Processing, Action::View)?;
    let recipes = state.recipes(&user).list_recipes().await?;
    Ok(Json(ApiResponse::ok(recipes)))
}

pub async fn get_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<String>,
) -> AppResult<Json<ApiResponse<Recipe>>> {
    check_permission(&user, Resource::Processing, Action::View)?;
    let recipe = state.recipes(&user).get_recipe(&recipe_id).await?;
    Ok(Json(ApiResponse::ok(recipe)))
}

pub async fn delete_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    check_permission(&user, Resource::Processing, Action::Delete)?;
    state.recipes(&user).delete_recipe(&recipe_id).await?;
    Ok(Json(ApiResponse::ok_with_message((), "Recipe deleted")))
}
