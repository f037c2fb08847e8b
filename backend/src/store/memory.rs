//! In-process document store used for tests and local runs without Postgres

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{Collection, DocumentStore};
use crate::error::AppResult;

type CollectionKey = (String, Collection);

/// Documents held in memory. The lock guards the maps only; it does not
/// make multi-document operations atomic.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<HashMap<CollectionKey, BTreeMap<String, Value>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(
        &self,
        workspace: &str,
        collection: Collection,
        id: &str,
    ) -> AppResult<Option<Value>> {
        let data = self.data.read().await;
        Ok(data
            .get(&(workspace.to_string(), collection))
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn list(&self, workspace: &str, collection: Collection) -> AppResult<Vec<Value>> {
        let data = self.data.read().await;
        Ok(data
            .get(&(workspace.to_string(), collection))
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn put(
        &self,
        workspace: &str,
        collection: Collection,
        id: &str,
        document: Value,
    ) -> AppResult<()> {
        let mut data = self.data.write().await;
        data.entry((workspace.to_string(), collection))
            .or_default()
            .insert(id.to_string(), document);
        Ok(())
    }

    async fn delete(&self, workspace: &str, collection: Collection, id: &str) -> AppResult<bool> {
        let mut data = self.data.write().await;
        Ok(data
            .get_mut(&(workspace.to_string(), collection))
            .and_then(|docs| docs.remove(id))
            .is_some())
    }

    async fn replace_all(
        &self,
        workspace: &str,
        collection: Collection,
        documents: Vec<(String, Value)>,
    ) -> AppResult<()> {
        let mut data = self.data.write().await;
        data.insert(
            (workspace.to_string(), collection),
            documents.into_iter().collect(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_workspaces_are_isolated() {
        let store = MemoryStore::new();
        store
            .put("ws-a", Collection::Batches, "B1", json!({"id": "B1"}))
            .await
            .unwrap();

        assert!(store.get("ws-a", Collection::Batches, "B1").await.unwrap().is_some());
        assert!(store.get("ws-b", Collection::Batches, "B1").await.unwrap().is_none());
        assert!(store.list("ws-a", Collection::Recipes).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_all_drops_missing_documents() {
        let store = MemoryStore::new();
        store
            .put("ws", Collection::Inventory, "old", json!({"id": "old"}))
            .await
            .unwrap();
        store
            .replace_all(
                "ws",
                Collection::Inventory,
                vec![("new".to_string(), json!({"id": "new"}))],
            )
            .await
            .unwrap();

        let docs = store.list("ws", Collection::Inventory).await.unwrap();
        assert_eq!(docs, vec![json!({"id": "new"})]);
        assert!(!store.delete("ws", Collection::Inventory, "old").await.unwrap());
    }
}
