//! `PostgreSQL` document store.
//!
//! Documents live in `storefront.documents`. Queries use the runtime
//! `sqlx::query` API so the crate builds without a live database.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;

use super::{Document, DocumentStore, RepositoryError};

/// Document store backed by the `storefront.documents` table.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    #[instrument(skip(self))]
    async fn list(&self, collection: &str) -> Result<Vec<Document>, RepositoryError> {
        let rows: Vec<(String, Json<Value>)> = sqlx::query_as(
            r"
            SELECT id, data
            FROM storefront.documents
            WHERE collection = $1
            ORDER BY id
            ",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, Json(data))| Document { id, data })
            .collect())
    }

    #[instrument(skip(self))]
    async fn count(&self, collection: &str) -> Result<u64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM storefront.documents WHERE collection = $1")
                .bind(collection)
                .fetch_one(&self.pool)
                .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, RepositoryError> {
        let row: Option<Json<Value>> = sqlx::query_scalar(
            "SELECT data FROM storefront.documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|Json(data)| data))
    }

    #[instrument(skip(self, data))]
    async fn put(&self, collection: &str, id: &str, data: Value) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO storefront.documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
            ",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(data))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[instrument(skip(self, documents), fields(count = documents.len()))]
    async fn replace_all(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<(), RepositoryError> {
        let keep: Vec<String> = documents.iter().map(|doc| doc.id.clone()).collect();
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query(
            r"
            DELETE FROM storefront.documents
            WHERE collection = $1 AND NOT (id = ANY($2))
            ",
        )
        .bind(collection)
        .bind(&keep)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        for doc in documents {
            sqlx::query(
                r"
                INSERT INTO storefront.documents (collection, id, data)
                VALUES ($1, $2, $3)
                ON CONFLICT (collection, id)
                DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
                ",
            )
            .bind(collection)
            .bind(&doc.id)
            .bind(Json(doc.data))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(removed, kept = keep.len(), "Collection replaced");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        by: i64,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO storefront.documents (collection, id, data)
            VALUES ($1, $2, jsonb_build_object($3::text, $4::bigint))
            ON CONFLICT (collection, id)
            DO UPDATE SET
                data = storefront.documents.data || jsonb_build_object(
                    $3::text,
                    CASE jsonb_typeof(storefront.documents.data -> $3::text)
                        WHEN 'number'
                            THEN TRUNC((storefront.documents.data ->> $3::text)::numeric)::bigint
                        ELSE 0
                    END + $4::bigint
                ),
                updated_at = NOW()
            ",
        )
        .bind(collection)
        .bind(id)
        .bind(field)
        .bind(by)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_all(&self, collection: &str) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM storefront.documents WHERE collection = $1")
            .bind(collection)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
