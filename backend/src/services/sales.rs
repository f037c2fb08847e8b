//! Sales fulfillment and customer service

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::allocation::plan_lot_drain;
use shared::types::generate_id;
use shared::validation::{validate_name, validate_price, validate_quantity};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{
    invoice_total, summarize_stock, Customer, FinishedGoodLot, PackagingType, PaymentMethod,
    ProductKey, ProductStock, SaleLineItem, SalesRecord, SalesStatus,
};
use crate::store::{DocumentStore, Repository};

/// Name recorded on a sale whose customer id is not on file
pub const UNKNOWN_CUSTOMER: &str = "Unknown";

#[derive(Clone)]
pub struct SalesService {
    sales: Repository<SalesRecord>,
    lots: Repository<FinishedGoodLot>,
    customers: Repository<Customer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleInput {
    pub customer_id: String,
    pub recipe_name: String,
    pub packaging_type: PackagingType,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub payment_method: PaymentMethod,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddCustomerInput {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub name: String,
    pub contact: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
}

impl SalesService {
    pub fn new(store: Arc<dyn DocumentStore>, workspace: &str) -> Self {
        Self {
            sales: Repository::new(store.clone(), workspace),
            lots: Repository::new(store.clone(), workspace),
            customers: Repository::new(store, workspace),
        }
    }

    // ========================================================================
    // Sales
    // ========================================================================

    /// Invoice a sale, draining the product's lots oldest packed first
    ///
    /// Stock is checked across all matching lots before any lot is touched,
    /// so an insufficient-stock failure changes nothing.
    pub async fn create_sale(&self, input: CreateSaleInput) -> AppResult<SalesRecord> {
        validate_quantity(input.quantity).map_err(|msg| AppError::validation("quantity", msg))?;
        validate_price(input.unit_price).map_err(|msg| AppError::validation("unitPrice", msg))?;

        let product = ProductKey::new(input.recipe_name.clone(), input.packaging_type);
        let lots = self.lots.list().await?;
        let draws = plan_lot_drain(&lots, &product, input.quantity)?;

        for draw in &draws {
            self.lots
                .update(&draw.lot_id, |lot| {
                    lot.quantity -= draw.quantity;
                    Ok(())
                })
                .await?;
        }

        let reference_lot = draws
            .first()
            .map(|d| d.lot_id.clone())
            .ok_or_else(|| AppError::Internal("Sale drained no lots".into()))?;

        let customer = self.customers.get(&input.customer_id).await?;
        let items = vec![SaleLineItem {
            finished_good_id: reference_lot,
            recipe_name: input.recipe_name,
            packaging_type: input.packaging_type,
            quantity: input.quantity,
            unit_price: input.unit_price,
        }];

        let sale = SalesRecord {
            id: generate_id("SALE"),
            invoice_id: generate_id("INV"),
            customer_id: input.customer_id,
            customer_name: customer
                .as_ref()
                .map(|c| c.name.clone())
                .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string()),
            customer_email: customer.as_ref().and_then(|c| c.email.clone()),
            customer_phone: customer.as_ref().and_then(|c| c.contact.clone()),
            total_amount: invoice_total(&items),
            items,
            payment_method: input.payment_method,
            status: SalesStatus::Invoiced,
            date_created: input.created_at.unwrap_or_else(Utc::now),
            date_delivered: None,
        };
        self.sales.put(&sale).await?;

        tracing::info!(
            "Invoice {}: {} x {} for {} ({} lot(s))",
            sale.invoice_id,
            input.quantity,
            product,
            sale.total_amount,
            draws.len()
        );
        Ok(sale)
    }

    /// Move a sale forward; delivery stamps the delivery date
    pub async fn update_sale_status(
        &self,
        sale_id: &str,
        status: SalesStatus,
    ) -> AppResult<SalesRecord> {
        let now = Utc::now();
        let sale = self
            .sales
            .update(sale_id, |sale| {
                if !sale.status.can_transition_to(status) {
                    return Err(AppError::InvalidStateTransition(format!(
                        "Sale {} is {:?}; cannot move to {:?}",
                        sale.id, sale.status, status
                    )));
                }
                sale.status = status;
                if status == SalesStatus::Delivered {
                    sale.date_delivered = Some(now);
                }
                Ok(())
            })
            .await?;

        tracing::info!("Sale {} is now {:?}", sale.id, sale.status);
        Ok(sale)
    }

    /// Sales, newest first
    pub async fn list_sales(&self) -> AppResult<Vec<SalesRecord>> {
        let mut sales = self.sales.list().await?;
        sales.sort_by(|a, b| b.date_created.cmp(&a.date_created));
        Ok(sales)
    }

    pub async fn get_sale(&self, id: &str) -> AppResult<SalesRecord> {
        self.sales.require(id).await
    }

    // ========================================================================
    // Product Catalog
    // ========================================================================

    /// Sellable products with stock on hand
    pub async fn available_products(&self) -> AppResult<Vec<ProductStock>> {
        Ok(summarize_stock(&self.lots.list().await?))
    }

    /// Set the selling price on every lot of a product
    pub async fn set_product_price(
        &self,
        product: &ProductKey,
        price: Decimal,
    ) -> AppResult<Vec<FinishedGoodLot>> {
        validate_price(price).map_err(|msg| AppError::validation("price", msg))?;

        let matching: Vec<FinishedGoodLot> = self
            .lots
            .list()
            .await?
            .into_iter()
            .filter(|l| product.matches(l))
            .collect();
        if matching.is_empty() {
            return Err(AppError::NotFound(format!("Product {}", product)));
        }

        let mut updated = Vec::with_capacity(matching.len());
        for mut lot in matching {
            lot.selling_price = price;
            self.lots.put(&lot).await?;
            updated.push(lot);
        }

        tracing::info!("Price of {} set to {} on {} lot(s)", product, price, updated.len());
        Ok(updated)
    }

    // ========================================================================
    // Customers
    // ========================================================================

    pub async fn add_customer(&self, input: AddCustomerInput) -> AppResult<Customer> {
        input.validate()?;
        validate_name(&input.name).map_err(|msg| AppError::validation("name", msg))?;
        let customer = Customer {
            id: input.id.unwrap_or_else(|| generate_id("CUST")),
            name: input.name.trim().to_string(),
            contact: input.contact,
            email: input.email,
            address: input.address,
        };
        self.customers.put(&customer).await?;
        tracing::info!("Added customer {}", customer.name);
        Ok(customer)
    }

    pub async fn list_customers(&self) -> AppResult<Vec<Customer>> {
        let mut customers = self.customers.list().await?;
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(customers)
    }
}
