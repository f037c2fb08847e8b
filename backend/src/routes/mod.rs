//! Route definitions for the ShroomTrack operations API

use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes; everything under `/api/v1` requires a bearer token
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/batches", batch_routes())
        .nest("/recipes", recipe_routes())
        .nest("/packing", packing_routes())
        .nest("/ledger", ledger_routes())
        .nest("/sales", sales_routes())
        .nest("/customers", customer_routes())
        .nest("/inventory", inventory_routes())
        .nest("/purchase-orders", purchase_order_routes())
        .nest("/suppliers", supplier_routes())
        .nest("/settings", settings_routes())
        .nest("/reports", reporting_routes())
        .nest("/sync", sync_routes())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Receiving and processing routes
fn batch_routes() -> Router<AppState> {
    use handlers::batch::*;
    Router::new()
        .route("/", get(list_batches).post(receive_batch))
        .route("/:batch_id", get(get_batch))
        .route("/:batch_id/start", post(start_processing))
        .route("/:batch_id/recipe", post(switch_recipe))
        .route("/:batch_id/complete", post(complete_processing))
        .route("/:batch_id/status", put(advance_status))
}

fn recipe_routes() -> Router<AppState> {
    use handlers::recipe::*;
    Router::new()
        .route("/", get(list_recipes).post(create_recipe))
        .route("/:recipe_id", get(get_recipe).delete(delete_recipe))
}

/// Packing routes
fn packing_routes() -> Router<AppState> {
    use handlers::packing::*;
    Router::new()
        .route("/recipe", post(pack_recipe))
        .route("/batch", post(pack_batch))
        .route("/preflight", get(packaging_preflight))
        .route("/estimate", get(estimate_units))
        .route("/lots", get(list_lots))
}

/// Cost ledger routes
fn ledger_routes() -> Router<AppState> {
    use handlers::ledger::*;
    Router::new()
        .route("/", get(list_transactions).post(record_transaction))
        .route("/totals", get(get_totals))
        .route("/breakdown", get(get_breakdown))
        .route("/:transaction_id", patch(update_transaction))
}

/// Sales and product catalog routes
fn sales_routes() -> Router<AppState> {
    use handlers::sales::*;
    Router::new()
        .route("/", get(list_sales).post(create_sale))
        .route("/products", get(available_products))
        .route("/products/price", put(set_product_price))
        .route("/:sale_id", get(get_sale))
        .route("/:sale_id/status", put(update_sale_status))
}

fn customer_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::sales::list_customers).post(handlers::sales::add_customer),
    )
}

/// Supply inventory routes
fn inventory_routes() -> Router<AppState> {
    use handlers::inventory::*;
    Router::new()
        .route("/", get(list_items).post(add_item))
        .route("/low-stock", get(low_stock_items))
        .route("/:item_id", get(get_item))
        .route("/:item_id/adjust", post(adjust_item))
}

/// Procurement routes
fn purchase_order_routes() -> Router<AppState> {
    use handlers::procurement::*;
    Router::new()
        .route("/", get(list_purchase_orders).post(create_purchase_order))
        .route("/:po_id/receive", post(receive_purchase_order))
        .route("/:po_id/complaint", post(file_complaint))
        .route("/:po_id/resolve", post(resolve_complaint))
}

fn supplier_routes() -> Router<AppState> {
    use handlers::procurement::*;
    Router::new()
        .route("/", get(list_suppliers).post(add_supplier))
        .route("/:supplier_id", delete(delete_supplier))
}

fn settings_routes() -> Router<AppState> {
    use handlers::settings::*;
    Router::new()
        .route("/rates", get(get_rates))
        .route("/rates/labor", put(set_labor_rate))
        .route("/rates/raw-material", put(set_raw_material_rate))
}

/// Dashboard and financial report routes
fn reporting_routes() -> Router<AppState> {
    use handlers::reporting::*;
    Router::new()
        .route("/overview", get(get_overview))
        .route("/financial", get(get_financial_summary))
        .route("/weekly-revenue", get(get_weekly_revenue))
        .route("/packing-history", get(get_packing_history))
}

/// Spreadsheet sync routes
fn sync_routes() -> Router<AppState> {
    use handlers::sync::*;
    Router::new()
        .route("/push", post(push))
        .route("/pull", post(pull))
        .route("/alerts", get(list_alerts))
        .route("/alerts/:alert_id", delete(clear_alert))
}
