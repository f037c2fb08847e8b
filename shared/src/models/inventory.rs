//! Packaging and label supply models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PackagingType;

/// A consumable supply item (tins, pouches, stickers)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<ItemSubtype>,
    /// Units on hand; may dip below zero when packing outruns stock
    pub quantity: i64,
    /// Low-stock trigger
    pub threshold: i64,
    pub unit: String,
    /// Price of one pack from the supplier
    pub unit_cost: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack_size: Option<i64>,
}

impl InventoryItem {
    /// Units per supplier pack, never below one
    pub fn effective_pack_size(&self) -> i64 {
        self.pack_size.filter(|s| *s > 0).unwrap_or(1)
    }

    /// Cost of a single unit (pack price spread over the pack)
    pub fn per_unit_cost(&self) -> Decimal {
        self.unit_cost / Decimal::from(self.effective_pack_size())
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.threshold
    }

    /// Container item consumed when packing into `packaging`
    pub fn is_container_for(&self, packaging: PackagingType) -> bool {
        self.item_type == ItemType::Packaging
            && self.subtype == Some(ItemSubtype::from(packaging))
    }

    /// Label applied to every packed unit
    pub fn is_label(&self) -> bool {
        self.item_type == ItemType::Label
            && matches!(self.subtype, None | Some(ItemSubtype::Sticker))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    Packaging,
    Label,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemSubtype {
    Tin,
    Pouch,
    Sticker,
}

impl From<PackagingType> for ItemSubtype {
    fn from(packaging: PackagingType) -> Self {
        match packaging {
            PackagingType::Tin => ItemSubtype::Tin,
            PackagingType::Pouch => ItemSubtype::Pouch,
        }
    }
}

/// Stock shortfall found before a packing run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SupplyShortfall {
    pub item_id: Option<String>,
    pub item_name: String,
    pub required: i64,
    pub available: i64,
}

impl SupplyShortfall {
    pub fn missing(&self) -> i64 {
        (self.required - self.available).max(0)
    }
}
