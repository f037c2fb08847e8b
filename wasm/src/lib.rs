//! WebAssembly module for ShroomTrack
//!
//! Provides client-side computation for:
//! - Packing allocation previews
//! - Cost breakdowns and weekly revenue
//! - Pack count estimates
//! - Offline form validation

use chrono::NaiveDate;
use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

use shared::allocation::{plan_fifo_allocation, BatchAvailability};
use shared::costing::{cost_breakdown, weekly_revenue, CostTotals};

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("ShroomTrack wasm module loaded"));
}

fn to_decimal(value: f64, field: &str) -> Result<Decimal, String> {
    Decimal::try_from(value).map_err(|_| format!("{} is not a finite number", field))
}

fn js_err(msg: String) -> JsValue {
    JsValue::from_str(&msg)
}

/// Plan which batches a packing run would draw from, as JSON
///
/// `candidates_json` is an array of `{batchId, dateReceived, remainingWeightKg}`.
pub fn allocation_preview(
    candidates_json: &str,
    weight_kg: f64,
    units: i64,
) -> Result<String, String> {
    let candidates: Vec<BatchAvailability> = serde_json::from_str(candidates_json)
        .map_err(|e| format!("Invalid candidates JSON: {}", e))?;
    let weight = to_decimal(weight_kg, "Weight")?;
    let plan = plan_fifo_allocation(&candidates, weight, units).map_err(|e| e.to_string())?;
    serde_json::to_string(&plan).map_err(|e| e.to_string())
}

#[wasm_bindgen]
pub fn preview_allocation(
    candidates_json: &str,
    weight_kg: f64,
    units: i32,
) -> Result<String, JsValue> {
    allocation_preview(candidates_json, weight_kg, i64::from(units)).map_err(js_err)
}

/// Category shares of a cost totals object, as JSON
#[wasm_bindgen]
pub fn cost_breakdown_json(totals_json: &str) -> Result<String, JsValue> {
    let totals: CostTotals = serde_json::from_str(totals_json)
        .map_err(|e| js_err(format!("Invalid totals JSON: {}", e)))?;
    serde_json::to_string(&cost_breakdown(&totals)).map_err(|e| js_err(e.to_string()))
}

/// Units a weight of product should fill
#[wasm_bindgen]
pub fn estimate_units(weight_kg: f64, yield_ratio: f64, pack_size_kg: f64) -> i32 {
    let (Ok(weight), Ok(ratio), Ok(pack)) = (
        to_decimal(weight_kg, "Weight"),
        to_decimal(yield_ratio, "Yield ratio"),
        to_decimal(pack_size_kg, "Pack size"),
    ) else {
        return 0;
    };
    i32::try_from(estimate_pack_count(weight, ratio, pack)).unwrap_or(i32::MAX)
}

/// Trailing-week delivered revenue ending on `today` (`YYYY-MM-DD`)
pub fn weekly_revenue_as_of(sales_json: &str, today: &str) -> Result<String, String> {
    let sales: Vec<SalesRecord> =
        serde_json::from_str(sales_json).map_err(|e| format!("Invalid sales JSON: {}", e))?;
    let today = NaiveDate::parse_from_str(today, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date: {}", e))?;
    serde_json::to_string(&weekly_revenue(&sales, today)).map_err(|e| e.to_string())
}

/// Trailing-week delivered revenue ending on the browser's current date
#[wasm_bindgen]
pub fn weekly_revenue_json(sales_json: &str) -> Result<String, JsValue> {
    let now = js_sys::Date::new_0();
    let today = format!(
        "{:04}-{:02}-{:02}",
        now.get_full_year(),
        now.get_month() + 1,
        now.get_date()
    );
    weekly_revenue_as_of(sales_json, &today).map_err(js_err)
}

/// Check a receiving form; returns the error message, if any
#[wasm_bindgen]
pub fn check_receiving_weights(raw_weight_kg: f64, spoiled_weight_kg: f64) -> Option<String> {
    let raw = to_decimal(raw_weight_kg, "Raw weight").ok()?;
    let spoiled = to_decimal(spoiled_weight_kg, "Spoiled weight").ok()?;
    validate_receiving_weights(raw, spoiled)
        .err()
        .map(str::to_string)
}

/// Check that QC good weight and wastage account for the batch
#[wasm_bindgen]
pub fn check_qc_reconciliation(input_kg: f64, good_kg: f64, wastage_kg: f64) -> Option<String> {
    let input = to_decimal(input_kg, "Input weight").ok()?;
    let good = to_decimal(good_kg, "Good weight").ok()?;
    let wastage = to_decimal(wastage_kg, "Wastage").ok()?;
    validate_qc_reconciliation(input, good, wastage)
        .err()
        .map(str::to_string)
}
