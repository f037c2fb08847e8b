//! Procurement service: suppliers and purchase orders

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use shared::types::generate_id;
use shared::validation::validate_name;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{resolution_restocks, PurchaseOrder, PurchaseOrderStatus, Supplier};
use crate::services::InventoryService;
use crate::store::{DocumentStore, Repository};

/// Complaint reason recorded when goods fail inspection on arrival
pub const DEFAULT_QC_FAILURE_REASON: &str = "QC Failed on Receipt";

#[derive(Clone)]
pub struct ProcurementService {
    orders: Repository<PurchaseOrder>,
    suppliers: Repository<Supplier>,
    inventory: InventoryService,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseOrderInput {
    pub item_id: String,
    #[validate(range(min = 1, message = "Order at least one pack"))]
    pub packs: i64,
    pub supplier: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivePurchaseOrderInput {
    pub qc_passed: bool,
    pub notes: Option<String>,
    pub complaint_reason: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddSupplierInput {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Supplier name is required"))]
    pub name: String,
    pub contact: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub items_supplied: Vec<String>,
}

impl ProcurementService {
    pub fn new(store: Arc<dyn DocumentStore>, workspace: &str) -> Self {
        Self {
            orders: Repository::new(store.clone(), workspace),
            suppliers: Repository::new(store.clone(), workspace),
            inventory: InventoryService::new(store, workspace),
        }
    }

    // ========================================================================
    // Purchase Orders
    // ========================================================================

    /// Order packs of an inventory item at its current pack price
    pub async fn create_purchase_order(
        &self,
        input: CreatePurchaseOrderInput,
    ) -> AppResult<PurchaseOrder> {
        input.validate()?;
        let item = self.inventory.get_item(&input.item_id).await?;

        let supplier = input
            .supplier
            .filter(|s| !s.trim().is_empty())
            .or_else(|| item.supplier.clone())
            .ok_or_else(|| AppError::validation("supplier", "Supplier is required"))?;

        let mut order = PurchaseOrder::ordered(
            generate_id("PO"),
            item.id.clone(),
            item.name.clone(),
            input.packs,
            item.effective_pack_size(),
            item.unit_cost,
            supplier,
            Utc::now(),
        );
        order.notes = input.notes;
        self.orders.put(&order).await?;

        tracing::info!(
            "Purchase order {}: {} x {} from {}",
            order.id,
            order.quantity,
            order.item_name,
            order.supplier
        );
        Ok(order)
    }

    /// Purchase orders, newest first
    pub async fn list_purchase_orders(&self) -> AppResult<Vec<PurchaseOrder>> {
        let mut orders = self.orders.list().await?;
        orders.sort_by(|a, b| b.date_ordered.cmp(&a.date_ordered));
        Ok(orders)
    }

    /// Inspect a delivery; passing goods go into stock, failures become complaints
    pub async fn receive_purchase_order(
        &self,
        po_id: &str,
        input: ReceivePurchaseOrderInput,
    ) -> AppResult<PurchaseOrder> {
        let order = self.orders.require(po_id).await?;
        let next = if input.qc_passed {
            PurchaseOrderStatus::Received
        } else {
            PurchaseOrderStatus::Complaint
        };
        ensure_transition(&order, next)?;

        if input.qc_passed {
            self.inventory
                .adjust_inventory(&order.item_id, order.total_units, None)
                .await?;
        }

        let now = Utc::now();
        let order = self
            .orders
            .update(po_id, |order| {
                order.status = next;
                order.qc_passed = Some(input.qc_passed);
                order.date_received = Some(now);
                if input.notes.is_some() {
                    order.notes = input.notes;
                }
                if !input.qc_passed {
                    order.complaint_reason = Some(
                        input
                            .complaint_reason
                            .filter(|r| !r.trim().is_empty())
                            .unwrap_or_else(|| DEFAULT_QC_FAILURE_REASON.to_string()),
                    );
                }
                Ok(())
            })
            .await?;

        tracing::info!("Purchase order {} is now {}", order.id, order.status);
        Ok(order)
    }

    pub async fn file_complaint(&self, po_id: &str, reason: &str) -> AppResult<PurchaseOrder> {
        if reason.trim().is_empty() {
            return Err(AppError::validation("reason", "Complaint reason is required"));
        }

        let order = self
            .orders
            .update(po_id, |order| {
                ensure_transition(order, PurchaseOrderStatus::Complaint)?;
                order.status = PurchaseOrderStatus::Complaint;
                order.complaint_reason = Some(reason.trim().to_string());
                Ok(())
            })
            .await?;

        tracing::info!("Complaint filed on purchase order {}", order.id);
        Ok(order)
    }

    /// Close a complaint. A replacement or late delivery restocks the item.
    pub async fn resolve_complaint(&self, po_id: &str, resolution: &str) -> AppResult<PurchaseOrder> {
        if resolution.trim().is_empty() {
            return Err(AppError::validation("resolution", "Resolution is required"));
        }
        let order = self.orders.require(po_id).await?;
        ensure_transition(&order, PurchaseOrderStatus::Resolved)?;

        if resolution_restocks(resolution) {
            self.inventory
                .adjust_inventory(&order.item_id, order.total_units, None)
                .await?;
        }

        let order = self
            .orders
            .update(po_id, |order| {
                order.status = PurchaseOrderStatus::Resolved;
                order.complaint_resolution = Some(resolution.trim().to_string());
                Ok(())
            })
            .await?;

        tracing::info!("Complaint on purchase order {} resolved", order.id);
        Ok(order)
    }

    // ========================================================================
    // Suppliers
    // ========================================================================

    pub async fn add_supplier(&self, input: AddSupplierInput) -> AppResult<Supplier> {
        input.validate()?;
        validate_name(&input.name).map_err(|msg| AppError::validation("name", msg))?;
        let supplier = Supplier {
            id: input.id.unwrap_or_else(|| generate_id("SUP")),
            name: input.name.trim().to_string(),
            contact: input.contact,
            address: input.address,
            items_supplied: input.items_supplied,
        };
        self.suppliers.put(&supplier).await?;
        tracing::info!("Added supplier {}", supplier.name);
        Ok(supplier)
    }

    pub async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        let mut suppliers = self.suppliers.list().await?;
        suppliers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(suppliers)
    }

    /// Remove a supplier. Existing purchase orders keep the supplier name.
    pub async fn delete_supplier(&self, id: &str) -> AppResult<()> {
        if !self.suppliers.delete(id).await? {
            return Err(AppError::NotFound(format!("Supplier {}", id)));
        }
        tracing::info!("Deleted supplier {}", id);
        Ok(())
    }
}

fn ensure_transition(order: &PurchaseOrder, next: PurchaseOrderStatus) -> AppResult<()> {
    if order.status.can_transition_to(next) {
        Ok(())
    } else {
        Err(AppError::InvalidStateTransition(format!(
            "Purchase order {} is {}; cannot move to {}",
            order.id, order.status, next
        )))
    }
}
