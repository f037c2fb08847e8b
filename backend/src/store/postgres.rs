//! Postgres document store backed by a single JSONB table

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use super::{Collection, DocumentStore};
use crate::error::AppResult;

#[derive(Clone)]
pub struct PgDocumentStore {
    db: PgPool,
}

impl PgDocumentStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(
        &self,
        workspace: &str,
        collection: Collection,
        id: &str,
    ) -> AppResult<Option<Value>> {
        let row: Option<(Value,)> = sqlx::query_as(
            r#"
            SELECT data FROM documents
            WHERE workspace_id = $1 AND collection = $2 AND id = $3
            "#,
        )
        .bind(workspace)
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|(data,)| data))
    }

    async fn list(&self, workspace: &str, collection: Collection) -> AppResult<Vec<Value>> {
        let rows: Vec<(Value,)> = sqlx::query_as(
            r#"
            SELECT data FROM documents
            WHERE workspace_id = $1 AND collection = $2
            ORDER BY id
            "#,
        )
        .bind(workspace)
        .bind(collection.as_str())
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|(data,)| data).collect())
    }

    async fn put(
        &self,
        workspace: &str,
        collection: Collection,
        id: &str,
        document: Value,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (workspace_id, collection, id, data, updated_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (workspace_id, collection, id)
            DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
            "#,
        )
        .bind(workspace)
        .bind(collection.as_str())
        .bind(id)
        .bind(document)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn delete(&self, workspace: &str, collection: Collection, id: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM documents WHERE workspace_id = $1 AND collection = $2 AND id = $3",
        )
        .bind(workspace)
        .bind(collection.as_str())
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn replace_all(
        &self,
        workspace: &str,
        collection: Collection,
        documents: Vec<(String, Value)>,
    ) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM documents WHERE workspace_id = $1 AND collection = $2")
            .bind(workspace)
            .bind(collection.as_str())
            .execute(&mut *tx)
            .await?;

        for (id, document) in documents {
            sqlx::query(
                r#"
                INSERT INTO documents (workspace_id, collection, id, data, updated_at)
                VALUES ($1, $2, $3, $4, NOW())
                "#,
            )
            .bind(workspace)
            .bind(collection.as_str())
            .bind(id)
            .bind(document)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
