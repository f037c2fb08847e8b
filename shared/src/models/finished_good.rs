//! Finished-goods models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Selling price given to newly packed lots
pub const DEFAULT_SELLING_PRICE: Decimal = Decimal::from_parts(1500, 0, 0, false, 2);

/// Output of one packing draw against a single batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinishedGoodLot {
    pub id: String,
    pub batch_id: String,
    pub recipe_name: String,
    pub packaging_type: PackagingType,
    /// Units still on hand; drained by sales
    pub quantity: i64,
    /// Units originally packed into this lot
    pub quantity_packed: i64,
    pub date_packed: DateTime<Utc>,
    pub selling_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl FinishedGoodLot {
    pub fn product_key(&self) -> ProductKey {
        ProductKey {
            recipe_name: self.recipe_name.clone(),
            packaging_type: self.packaging_type,
        }
    }
}

/// Packaging container a product is packed into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackagingType {
    Tin,
    Pouch,
}

impl std::fmt::Display for PackagingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackagingType::Tin => write!(f, "TIN"),
            PackagingType::Pouch => write!(f, "POUCH"),
        }
    }
}

/// A sellable product: one recipe in one packaging type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductKey {
    pub recipe_name: String,
    pub packaging_type: PackagingType,
}

impl ProductKey {
    pub fn new(recipe_name: impl Into<String>, packaging_type: PackagingType) -> Self {
        Self {
            recipe_name: recipe_name.into(),
            packaging_type,
        }
    }

    pub fn matches(&self, lot: &FinishedGoodLot) -> bool {
        lot.recipe_name == self.recipe_name && lot.packaging_type == self.packaging_type
    }
}

impl std::fmt::Display for ProductKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.recipe_name, self.packaging_type)
    }
}

/// Stock on hand for one product across all of its lots
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductStock {
    pub key: ProductKey,
    /// Oldest lot still holding stock; used as the sale line reference
    pub sample_lot_id: String,
    pub total_quantity: i64,
    pub selling_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Group lots with stock into per-product totals, ordered by product key
pub fn summarize_stock(lots: &[FinishedGoodLot]) -> Vec<ProductStock> {
    let mut in_stock: Vec<&FinishedGoodLot> = lots.iter().filter(|l| l.quantity > 0).collect();
    in_stock.sort_by(|a, b| a.date_packed.cmp(&b.date_packed));

    let mut products: std::collections::BTreeMap<ProductKey, ProductStock> =
        std::collections::BTreeMap::new();
    for lot in in_stock {
        products
            .entry(lot.product_key())
            .and_modify(|p| p.total_quantity += lot.quantity)
            .or_insert_with(|| ProductStock {
                key: lot.product_key(),
                sample_lot_id: lot.id.clone(),
                total_quantity: lot.quantity,
                selling_price: lot.selling_price,
                image_url: lot.image_url.clone(),
            });
    }

    products.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn lot(id: &str, recipe: &str, packaging: PackagingType, qty: i64, day: i64) -> FinishedGoodLot {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        FinishedGoodLot {
            id: id.into(),
            batch_id: "BATCH-1".into(),
            recipe_name: recipe.into(),
            packaging_type: packaging,
            quantity: qty,
            quantity_packed: qty,
            date_packed: base + Duration::days(day),
            selling_price: DEFAULT_SELLING_PRICE,
            image_url: None,
        }
    }

    #[test]
    fn test_default_price() {
        assert_eq!(DEFAULT_SELLING_PRICE, Decimal::from(15));
    }

    #[test]
    fn test_summarize_stock_groups_by_product() {
        let lots = vec![
            lot("FG-2", "Chips", PackagingType::Tin, 4, 2),
            lot("FG-1", "Chips", PackagingType::Tin, 6, 1),
            lot("FG-3", "Chips", PackagingType::Pouch, 3, 1),
            lot("FG-4", "Dried", PackagingType::Pouch, 0, 1),
        ];

        let stock = summarize_stock(&lots);
        assert_eq!(stock.len(), 2);

        let tins = stock
            .iter()
            .find(|s| s.key == ProductKey::new("Chips", PackagingType::Tin))
            .unwrap();
        assert_eq!(tins.total_quantity, 10);
        assert_eq!(tins.sample_lot_id, "FG-1");
    }
}
