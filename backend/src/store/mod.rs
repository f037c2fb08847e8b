//! Workspace-scoped document persistence
//!
//! Every record is a JSON document keyed by (workspace, collection, id).
//! [`DocumentStore`] is the raw backend; [`Repository`] adds typed access on
//! top of it for one collection within one workspace.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::models::{
    Batch, CostTransaction, Customer, FinishedGoodLot, InventoryItem, PurchaseOrder, RateSettings,
    Recipe, SalesRecord, Supplier,
};

/// Logical collections stored per workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Batches,
    FinishedGoods,
    Inventory,
    CostTransactions,
    Sales,
    Customers,
    Suppliers,
    PurchaseOrders,
    Recipes,
    Settings,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Batches => "batches",
            Collection::FinishedGoods => "finished_goods",
            Collection::Inventory => "inventory",
            Collection::CostTransactions => "cost_transactions",
            Collection::Sales => "sales",
            Collection::Customers => "customers",
            Collection::Suppliers => "suppliers",
            Collection::PurchaseOrders => "purchase_orders",
            Collection::Recipes => "recipes",
            Collection::Settings => "settings",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw JSON document storage
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, workspace: &str, collection: Collection, id: &str)
        -> AppResult<Option<Value>>;

    async fn list(&self, workspace: &str, collection: Collection) -> AppResult<Vec<Value>>;

    /// Insert or overwrite a document
    async fn put(&self, workspace: &str, collection: Collection, id: &str, document: Value)
        -> AppResult<()>;

    /// Returns whether a document was removed
    async fn delete(&self, workspace: &str, collection: Collection, id: &str) -> AppResult<bool>;

    /// Replace every document in a collection
    async fn replace_all(
        &self,
        workspace: &str,
        collection: Collection,
        documents: Vec<(String, Value)>,
    ) -> AppResult<()>;
}

/// A record type stored in one collection
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;
    /// Human-readable name used in not-found errors
    const LABEL: &'static str;

    fn id(&self) -> &str;
}

/// Typed view over one collection within one workspace
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    workspace: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            workspace: self.workspace.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Document> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>, workspace: impl Into<String>) -> Self {
        Self {
            store,
            workspace: workspace.into(),
            _marker: PhantomData,
        }
    }

    pub async fn get(&self, id: &str) -> AppResult<Option<T>> {
        match self.store.get(&self.workspace, T::COLLECTION, id).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Like [`Repository::get`] but a missing record is an error
    pub async fn require(&self, id: &str) -> AppResult<T> {
        self.get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {}", T::LABEL, id)))
    }

    pub async fn list(&self) -> AppResult<Vec<T>> {
        self.store
            .list(&self.workspace, T::COLLECTION)
            .await?
            .into_iter()
            .map(|value| serde_json::from_value(value).map_err(AppError::from))
            .collect()
    }

    pub async fn put(&self, record: &T) -> AppResult<()> {
        let value = serde_json::to_value(record)?;
        self.store
            .put(&self.workspace, T::COLLECTION, record.id(), value)
            .await
    }

    /// Read-modify-write a single record
    ///
    /// Not atomic: a concurrent writer between the read and the write wins
    /// or loses arbitrarily.
    pub async fn update<F>(&self, id: &str, apply: F) -> AppResult<T>
    where
        F: FnOnce(&mut T) -> AppResult<()> + Send,
    {
        let mut record = self.require(id).await?;
        apply(&mut record)?;
        self.put(&record).await?;
        Ok(record)
    }

    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        self.store.delete(&self.workspace, T::COLLECTION, id).await
    }

    pub async fn replace_all(&self, records: &[T]) -> AppResult<()> {
        let documents = records
            .iter()
            .map(|r| Ok((r.id().to_string(), serde_json::to_value(r)?)))
            .collect::<AppResult<Vec<_>>>()?;
        self.store
            .replace_all(&self.workspace, T::COLLECTION, documents)
            .await
    }
}

// ============================================================================
// Document impls
// ============================================================================

macro_rules! document {
    ($ty:ty, $collection:expr, $label:expr) => {
        impl Document for $ty {
            const COLLECTION: Collection = $collection;
            const LABEL: &'static str = $label;

            fn id(&self) -> &str {
                &self.id
            }
        }
    };
}

document!(Batch, Collection::Batches, "Batch");
document!(FinishedGoodLot, Collection::FinishedGoods, "Finished good");
document!(InventoryItem, Collection::Inventory, "Inventory item");
document!(CostTransaction, Collection::CostTransactions, "Cost transaction");
document!(SalesRecord, Collection::Sales, "Sale");
document!(Customer, Collection::Customers, "Customer");
document!(Supplier, Collection::Suppliers, "Supplier");
document!(PurchaseOrder, Collection::PurchaseOrders, "Purchase order");
document!(Recipe, Collection::Recipes, "Recipe");

/// Workspace rates are a singleton document
pub const RATE_SETTINGS_ID: &str = "rates";

impl Document for RateSettings {
    const COLLECTION: Collection = Collection::Settings;
    const LABEL: &'static str = "Settings";

    fn id(&self) -> &str {
        RATE_SETTINGS_ID
    }
}
