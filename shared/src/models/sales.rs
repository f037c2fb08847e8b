//! Sales and customer models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PackagingType;

/// A wholesale or retail customer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// An invoiced sale
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    pub id: String,
    pub invoice_id: String,
    pub customer_id: String,
    pub customer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    pub items: Vec<SaleLineItem>,
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub status: SalesStatus,
    pub date_created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_delivered: Option<DateTime<Utc>>,
}

impl SalesRecord {
    pub fn is_delivered(&self) -> bool {
        self.status == SalesStatus::Delivered
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineItem {
    pub finished_good_id: String,
    pub recipe_name: String,
    pub packaging_type: PackagingType,
    pub quantity: i64,
    pub unit_price: Decimal,
}

impl SaleLineItem {
    pub fn amount(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// Sum of quantity × unit price across line items
pub fn invoice_total(items: &[SaleLineItem]) -> Decimal {
    items.iter().map(SaleLineItem::amount).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SalesStatus {
    Invoiced,
    Delivered,
}

impl SalesStatus {
    /// INVOICED → DELIVERED is the only transition; DELIVERED is terminal
    pub fn can_transition_to(self, next: SalesStatus) -> bool {
        matches!((self, next), (SalesStatus::Invoiced, SalesStatus::Delivered))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Cod,
    CreditCard,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_total() {
        let items = vec![
            SaleLineItem {
                finished_good_id: "FG-1".into(),
                recipe_name: "Chips".into(),
                packaging_type: PackagingType::Tin,
                quantity: 3,
                unit_price: Decimal::new(1550, 2),
            },
            SaleLineItem {
                finished_good_id: "FG-2".into(),
                recipe_name: "Dried".into(),
                packaging_type: PackagingType::Pouch,
                quantity: 2,
                unit_price: Decimal::from(9),
            },
        ];
        assert_eq!(invoice_total(&items), Decimal::new(6450, 2));
    }

    #[test]
    fn test_delivered_is_terminal() {
        assert!(SalesStatus::Invoiced.can_transition_to(SalesStatus::Delivered));
        assert!(!SalesStatus::Delivered.can_transition_to(SalesStatus::Invoiced));
        assert!(!SalesStatus::Delivered.can_transition_to(SalesStatus::Delivered));
        assert!(!SalesStatus::Invoiced.can_transition_to(SalesStatus::Invoiced));
    }

    #[test]
    fn test_payment_method_wire_names() {
        let json = serde_json::to_string(&PaymentMethod::CreditCard).unwrap();
        assert_eq!(json, "\"CREDIT_CARD\"");
    }
}
