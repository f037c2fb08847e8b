//! Packaging and label inventory service

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use shared::types::generate_id;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{InventoryItem, ItemSubtype, ItemType, PackagingType, SupplyShortfall};
use crate::store::{DocumentStore, Repository};

/// Inventory service for supply items and stock movements
#[derive(Clone)]
pub struct InventoryService {
    items: Repository<InventoryItem>,
}

/// Input for adding a supply item
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddInventoryItemInput {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub subtype: Option<ItemSubtype>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Threshold cannot be negative"))]
    pub threshold: i64,
    #[validate(length(min = 1, message = "Unit is required"))]
    pub unit: String,
    #[serde(default)]
    pub unit_cost: Decimal,
    pub supplier: Option<String>,
    #[validate(range(min = 1, message = "Pack size must be at least one"))]
    pub pack_size: Option<i64>,
}

/// Input for a manual stock adjustment
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustInventoryInput {
    pub delta: i64,
    pub unit_cost: Option<Decimal>,
}

/// Supplies consumed by one packing draw
#[derive(Debug, Clone, PartialEq)]
pub struct SupplyConsumption {
    pub units: i64,
    pub cost: Decimal,
}

impl InventoryService {
    pub fn new(store: Arc<dyn DocumentStore>, workspace: &str) -> Self {
        Self {
            items: Repository::new(store, workspace),
        }
    }

    /// Add an item, or return the existing item with the same name
    ///
    /// Re-adding a known name only refreshes its supplier.
    pub async fn add_inventory_item(&self, input: AddInventoryItemInput) -> AppResult<InventoryItem> {
        input.validate()?;
        if input.unit_cost < Decimal::ZERO {
            return Err(AppError::validation("unitCost", "Unit cost cannot be negative"));
        }

        let name = input.name.trim().to_string();
        if let Some(existing) = self.find_by_name(&name).await? {
            let item = match input.supplier {
                Some(supplier) => {
                    self.items
                        .update(&existing.id, |item| {
                            item.supplier = Some(supplier);
                            Ok(())
                        })
                        .await?
                }
                None => existing,
            };
            tracing::debug!("Inventory item {} already exists", item.name);
            return Ok(item);
        }

        let item = InventoryItem {
            id: input.id.unwrap_or_else(|| generate_id("INV")),
            name,
            item_type: input.item_type,
            subtype: input.subtype,
            quantity: input.quantity,
            threshold: input.threshold,
            unit: input.unit,
            unit_cost: input.unit_cost,
            supplier: input.supplier,
            pack_size: input.pack_size,
        };
        self.items.put(&item).await?;
        tracing::info!("Added inventory item {} ({})", item.name, item.id);
        Ok(item)
    }

    pub async fn list_items(&self) -> AppResult<Vec<InventoryItem>> {
        let mut items = self.items.list().await?;
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    pub async fn get_item(&self, id: &str) -> AppResult<InventoryItem> {
        self.items.require(id).await
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<InventoryItem>> {
        Ok(self.items.list().await?.into_iter().find(|i| i.name == name))
    }

    /// Add (or with a negative delta, remove) stock
    pub async fn adjust_inventory(
        &self,
        item_id: &str,
        delta: i64,
        unit_cost: Option<Decimal>,
    ) -> AppResult<InventoryItem> {
        if let Some(cost) = unit_cost {
            if cost < Decimal::ZERO {
                return Err(AppError::validation("unitCost", "Unit cost cannot be negative"));
            }
        }

        let item = self
            .items
            .update(item_id, |item| {
                item.quantity += delta;
                if let Some(cost) = unit_cost {
                    item.unit_cost = cost;
                }
                Ok(())
            })
            .await?;

        tracing::info!("Adjusted {} by {} to {}", item.name, delta, item.quantity);
        Ok(item)
    }

    /// Items below their reorder threshold
    pub async fn low_stock_items(&self) -> AppResult<Vec<InventoryItem>> {
        Ok(self
            .list_items()
            .await?
            .into_iter()
            .filter(InventoryItem::is_low_stock)
            .collect())
    }

    /// Container and label shortfalls for packing `units` into `packaging`
    ///
    /// A missing item counts as a shortfall with nothing available.
    pub async fn packaging_preflight(
        &self,
        packaging: PackagingType,
        units: i64,
    ) -> AppResult<Vec<SupplyShortfall>> {
        let items = self.items.list().await?;
        let container = items.iter().find(|i| i.is_container_for(packaging));
        let label = items.iter().find(|i| i.is_label());

        let required = [
            (container, format!("{} container", packaging)),
            (label, "Label".to_string()),
        ];

        Ok(required
            .into_iter()
            .filter_map(|(item, fallback_name)| {
                let shortfall = match item {
                    Some(item) => SupplyShortfall {
                        item_id: Some(item.id.clone()),
                        item_name: item.name.clone(),
                        required: units,
                        available: item.quantity,
                    },
                    None => SupplyShortfall {
                        item_id: None,
                        item_name: fallback_name,
                        required: units,
                        available: 0,
                    },
                };
                (shortfall.missing() > 0).then_some(shortfall)
            })
            .collect())
    }

    /// Take the container and label for `units` packs out of stock
    ///
    /// Stock may go negative; the shortfall is logged, not refused.
    pub async fn consume_packaging(
        &self,
        packaging: PackagingType,
        units: i64,
    ) -> AppResult<SupplyConsumption> {
        let items = self.items.list().await?;
        let mut cost = Decimal::ZERO;

        let container = items.iter().find(|i| i.is_container_for(packaging));
        let label = items.iter().find(|i| i.is_label());
        if container.is_none() {
            tracing::warn!("No {} container item in inventory; packing without one", packaging);
        }
        if label.is_none() {
            tracing::warn!("No label item in inventory; packing without one");
        }

        for item in [container, label].into_iter().flatten() {
            cost += Decimal::from(units) * item.per_unit_cost();
            let updated = self
                .items
                .update(&item.id, |item| {
                    item.quantity -= units;
                    Ok(())
                })
                .await?;
            if updated.quantity < 0 {
                tracing::warn!(
                    "Inventory for {} is negative ({}) after packing",
                    updated.name,
                    updated.quantity
                );
            }
        }

        Ok(SupplyConsumption { units, cost })
    }
}
