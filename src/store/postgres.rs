//! PostgreSQL Document Store
//!
//! Documents live as JSONB rows in a single `documents` table keyed by
//! `(collection, document_id)`. Merges lock the row for the duration of
//! the transaction, so increments are atomic across concurrent writers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{PgPool, Row};

use super::{apply_merge, Document, DocumentStore, MergePatch, StoreError};

/// Document store backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a new PgDocumentStore with a database pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Single merge attempt
    async fn try_merge_upsert(
        &self,
        collection: &str,
        document_id: &str,
        patch: &MergePatch,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        // Make sure the row exists so it can be locked
        sqlx::query(
            r#"
            INSERT INTO documents (collection, document_id, data)
            VALUES ($1, $2, '{}'::jsonb)
            ON CONFLICT (collection, document_id) DO NOTHING
            "#,
        )
        .bind(collection)
        .bind(document_id)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query(
            r#"
            SELECT data, NOW() AS server_now
            FROM documents
            WHERE collection = $1 AND document_id = $2
            FOR UPDATE
            "#,
        )
        .bind(collection)
        .bind(document_id)
        .fetch_one(&mut *tx)
        .await?;

        let data: Value = row.try_get("data")?;
        let server_now: DateTime<Utc> = row.try_get("server_now")?;

        let mut merged = match data {
            Value::Object(map) => map,
            _ => Document::new(),
        };
        apply_merge(&mut merged, patch, server_now)?;

        sqlx::query(
            r#"
            UPDATE documents
            SET data = $3, updated_at = NOW()
            WHERE collection = $1 AND document_id = $2
            "#,
        )
        .bind(collection)
        .bind(document_id)
        .bind(Value::Object(merged))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn merge_upsert(
        &self,
        collection: &str,
        document_id: &str,
        patch: &MergePatch,
    ) -> Result<(), StoreError> {
        self.try_merge_upsert(collection, document_id, patch)
            .await
            .map_err(StoreError::classified)?;

        tracing::debug!("Merged {:?} into {}/{}", patch, collection, document_id);

        Ok(())
    }

    async fn get(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let data: Option<Value> = sqlx::query_scalar(
            "SELECT data FROM documents WHERE collection = $1 AND document_id = $2",
        )
        .bind(collection)
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e).classified())?;

        Ok(data.map(|value| match value {
            Value::Object(map) => map,
            _ => Document::new(),
        }))
    }
}
