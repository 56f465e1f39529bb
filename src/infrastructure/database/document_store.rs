use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::{Row, SqlitePool};

use crate::domain::ports::DocumentStore;

/// `SQLite` implementation of the `DocumentStore` port
///
/// Documents live in one `documents` table keyed by (collection, key), with
/// the JSON payload serialized into a TEXT column. Upserts use
/// `ON CONFLICT ... DO UPDATE` for replace semantics, so at most one document
/// exists per key at all times.
pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    /// Create a new `SqliteDocumentStore`
    ///
    /// # Arguments
    /// * `pool` - `SQLite` connection pool
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>> {
        let row = sqlx::query(
            r#"
            SELECT value
            FROM documents
            WHERE collection = ? AND key = ?
            "#,
        )
        .bind(collection)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .context("failed to query document")?;

        match row {
            Some(r) => {
                let value: Value = serde_json::from_str(r.get::<String, _>("value").as_str())
                    .context("failed to deserialize document")?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn upsert(&self, collection: &str, key: &str, value: Value) -> Result<()> {
        let value_json = serde_json::to_string(&value).context("failed to serialize document")?;
        let updated_at_str = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO documents (collection, key, value, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(collection, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(collection)
        .bind(key)
        .bind(&value_json)
        .bind(&updated_at_str)
        .execute(&self.pool)
        .await
        .context("failed to upsert document")?;

        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM documents
            WHERE collection = ? AND key = ?
            "#,
        )
        .bind(collection)
        .bind(key)
        .execute(&self.pool)
        .await
        .context("failed to delete document")?;

        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>> {
        let rows = sqlx::query(
            r#"
            SELECT value
            FROM documents
            WHERE collection = ?
            ORDER BY key ASC
            "#,
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .context("failed to list documents")?;

        let mut values = Vec::with_capacity(rows.len());
        for r in rows {
            values.push(
                serde_json::from_str(r.get::<String, _>("value").as_str())
                    .context("failed to deserialize document")?,
            );
        }
        Ok(values)
    }
}
