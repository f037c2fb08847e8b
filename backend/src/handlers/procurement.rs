//! HTTP handlers for purchase orders and suppliers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use shared::types::ApiResponse;

use crate::error::AppResult;
use crate::middleware::{check_permission, CurrentUser};
use crate::models::{Action, PurchaseOrder, Resource, Supplier};
use crate::services::procurement::{
    AddSupplierInput, CreatePurchaseOrderInput, ReceivePurchaseOrderInput,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ComplaintInput {
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct ResolutionInput {
    pub resolution: String,
}

pub async fn create_purchase_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreatePurchaseOrderInput>,
) -> AppResult<Json<ApiResponse<PurchaseOrder>>> {
    check_permission(&user, Resource::Procurement, Action::Create)?;
    let order = state.procurement(&user).create_purchase_order(input).await?;
    Ok(Json(ApiResponse::ok(order)))
}

pub async fn list_purchase_orders(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<PurchaseOrder>>>> {
    check_permission(&user, Resource::Procurement, Action::View)?;
    let orders = state.procurement(&user).list_purchase_orders().await?;
    Ok(Json(ApiResponse::ok(orders)))
}

/// Record the QC outcome of a delivery
pub async fn receive_purchase_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(po_id): Path<String>,
    Json(input): Json<ReceivePurchaseOrderInput>,
) -> AppResult<Json<ApiResponse<PurchaseOrder>>> {
    check_permission(&user, Resource::Procurement, Action::Edit)?;
    let order = state
        .procurement(&user)
        .receive_purchase_order(&po_id, input)
        .await?;
    Ok(Json(ApiResponse::ok(order)))
}

pub async fn file_complaint(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(po_id): Path<String>,
    Json(input): Json<ComplaintInput>,
) -> AppResult<Json<ApiResponse<PurchaseOrder>>> {
    check_permission(&user, Resource::Procurement, Action::Edit)?;
    let order = state
        .procurement(&user)
        .file_complaint(&po_id, &input.reason)
        .await?;
    Ok(Json(ApiResponse::ok(order)))
}

pub async fn resolve_complaint(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(po_id): Path<String>,
    Json(input): Json<ResolutionInput>,
) -> AppResult<Json<ApiResponse<PurchaseOrder>>> {
    check_permission(&user, Resource::Procurement, Action::Edit)?;
    let order = state
        .procurement(&user)
        .resolve_complaint(&po_id, &input.resolution)
        .await?;
    Ok(Json(ApiResponse::ok(order)))
}

pub async fn add_supplier(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<AddSupplierInput>,
) -> AppResult<Json<ApiResponse<Supplier>>> {
    check_permission(&user, Resource::Procurement, Action::Create)?;
    let supplier = state.procurement(&user).add_supplier(input).await?;
    Ok(Json(ApiResponse::ok(supplier)))
}

pub async fn list_suppliers(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Supplier>>>> {
    check_permission(&user, Resource::Procurement, Action::View)?;
    let suppliers = state.procurement(&user).list_suppliers().await?;
    Ok(Json(ApiResponse::ok(suppliers)))
}

pub async fn delete_supplier(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(supplier_id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    check_permission(&user, Resource::Procurement, Action::Delete)?;
    state.procurement(&user).delete_supplier(&supplier_id).await?;
    Ok(Json(ApiResponse::ok_with_message((), "Supplier deleted")))
}
