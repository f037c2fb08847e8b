//! HTTP handlers for sales and customer endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::types::ApiResponse;

use crate::error::AppResult;
use crate::middleware::{check_permission, CurrentUser};
use crate::models::{
    Action, Customer, FinishedGoodLot, PackagingType, ProductKey, ProductStock, Resource,
    SalesRecord, SalesStatus,
};
use crate::services::sales::{AddCustomerInput, CreateSaleInput};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SaleStatusUpdate {
    pub status: SalesStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPriceInput {
    pub recipe_name: String,
    pub packaging_type: PackagingType,
    pub price: Decimal,
}

/// Invoice a sale against finished stock
pub async fn create_sale(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateSaleInput>,
) -> AppResult<Json<ApiResponse<SalesRecord>>> {
    check_permission(&user, Resource::Sales, Action::Create)?;
    let sale = state.sales(&user).create_sale(input).await?;
    Ok(Json(ApiResponse::ok(sale)))
}

pub async fn list_sales(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<SalesRecord>>>> {
    check_permission(&user, Resource::Sales, Action::View)?;
    let sales = state.sales(&user).list_sales().await?;
    Ok(Json(ApiResponse::ok(sales)))
}

pub async fn get_sale(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(sale_id): Path<String>,
) -> AppResult<Json<ApiResponse<SalesRecord>>> {
    check_permission(&user, Resource::Sales, Action::View)?;
    let sale = state.sales(&user).get_sale(&sale_id).await?;
    Ok(Json(ApiResponse::ok(sale)))
}

/// Mark a sale delivered
pub async fn update_sale_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(sale_id): Path<String>,
    Json(input): Json<SaleStatusUpdate>,
) -> AppResult<Json<ApiResponse<SalesRecord>>> {
    check_permission(&user, Resource::Sales, Action::Edit)?;
    let sale = state
        .sales(&user)
        .update_sale_status(&sale_id, input.status)
        .await?;
    Ok(Json(ApiResponse::ok(sale)))
}

/// Products with stock on hand
pub async fn available_products(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<ProductStock>>>> {
    check_permission(&user, Resource::Sales, Action::View)?;
    let products = state.sales(&user).available_products().await?;
    Ok(Json(ApiResponse::ok(products)))
}

pub async fn set_product_price(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<SetPriceInput>,
) -> AppResult<Json<ApiResponse<Vec<FinishedGoodLot>>>> {
    check_permission(&user, Resource::Sales, Action::Edit)?;
    let product = ProductKey::new(input.recipe_name, input.packaging_type);
    let lots = state
        .sales(&user)
        .set_product_price(&product, input.price)
        .await?;
    Ok(Json(ApiResponse::ok(lots)))
}

pub async fn add_customer(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<AddCustomerInput>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    check_permission(&user, Resource::Sales, Action::Create)?;
    let customer = state.sales(&user).add_customer(input).await?;
    Ok(Json(ApiResponse::ok(customer)))
}

pub async fn list_customers(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Customer>>>> {
    check_permission(&user, Resource::Sales, Action::View)?;
    let customers = state.sales(&user).list_customers().await?;
    Ok(Json(ApiResponse::ok(customers)))
}
