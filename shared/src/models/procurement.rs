//! Procurement models: suppliers and purchase orders

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A packaging/label supplier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub items_supplied: Vec<String>,
}

/// An order of supply packs from a supplier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: String,
    pub item_id: String,
    pub item_name: String,
    /// Number of packs ordered
    pub quantity: i64,
    pub pack_size: i64,
    pub total_units: i64,
    pub unit_cost: Decimal,
    pub total_cost: Decimal,
    pub status: PurchaseOrderStatus,
    pub date_ordered: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_received: Option<DateTime<Utc>>,
    pub supplier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qc_passed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complaint_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complaint_resolution: Option<String>,
}

impl PurchaseOrder {
    /// Build a new order; totals derive from packs, pack size and pack price
    #[allow(clippy::too_many_arguments)]
    pub fn ordered(
        id: String,
        item_id: String,
        item_name: String,
        packs: i64,
        pack_size: i64,
        unit_cost: Decimal,
        supplier: String,
        date_ordered: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            item_id,
            item_name,
            quantity: packs,
            pack_size,
            total_units: packs * pack_size,
            unit_cost,
            total_cost: Decimal::from(packs) * unit_cost,
            status: PurchaseOrderStatus::Ordered,
            date_ordered,
            date_received: None,
            supplier,
            notes: None,
            qc_passed: None,
            complaint_reason: None,
            complaint_resolution: None,
        }
    }
}

/// ORDERED → RECEIVED | COMPLAINT → RESOLVED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseOrderStatus {
    Ordered,
    Received,
    Complaint,
    Resolved,
}

impl PurchaseOrderStatus {
    pub fn can_transition_to(self, next: PurchaseOrderStatus) -> bool {
        use PurchaseOrderStatus::*;
        matches!(
            (self, next),
            (Ordered, Received) | (Ordered, Complaint) | (Complaint, Resolved)
        )
    }
}

impl std::fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PurchaseOrderStatus::Ordered => write!(f, "ORDERED"),
            PurchaseOrderStatus::Received => write!(f, "RECEIVED"),
            PurchaseOrderStatus::Complaint => write!(f, "COMPLAINT"),
            PurchaseOrderStatus::Resolved => write!(f, "RESOLVED"),
        }
    }
}

/// Whether a complaint resolution brings the goods into stock
pub fn resolution_restocks(resolution: &str) -> bool {
    let lower = resolution.to_lowercase();
    lower.contains("replacement") || lower.contains("received")
}
