//! Document store for the storefront catalog.
//!
//! # Database: `mousse_melts`
//!
//! Catalog data is schemaless JSON, grouped into collections:
//!
//! ## Tables
//!
//! - `storefront.documents` - One row per `(collection, id)` with a `jsonb` body
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! ## Collections
//!
//! - `products/<id>` - One product per document
//! - `coupons/<id>` - One coupon per document
//! - `config/main_settings` - Announcement and hero settings
//! - `stats/general` - Visit and lead counters
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p mousse-melts-cli -- migrate
//! ```

pub mod catalog;
pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use catalog::CatalogRepository;
pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// Errors from document store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A stored JSON document and its key within the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    #[must_use]
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// Collection-of-documents storage.
///
/// Listing order is by document ID within a collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents in a collection.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, RepositoryError>;

    /// Number of documents in a collection.
    async fn count(&self, collection: &str) -> Result<u64, RepositoryError>;

    /// A single document, if present.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, RepositoryError>;

    /// Create or overwrite a single document.
    async fn put(&self, collection: &str, id: &str, data: Value) -> Result<(), RepositoryError>;

    /// Replace a whole collection with `documents` in one atomic step.
    ///
    /// Stored documents whose IDs are absent from `documents` are deleted;
    /// every given document is then upserted.
    async fn replace_all(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<(), RepositoryError>;

    /// Atomically add `by` to a numeric field, creating the document and the
    /// field as needed.
    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        by: i64,
    ) -> Result<(), RepositoryError>;

    /// Delete every document in a collection. Returns how many were removed.
    async fn delete_all(&self, collection: &str) -> Result<u64, RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
