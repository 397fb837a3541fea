//! Typed access to the catalog collections.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

use mousse_melts_core::catalog::{fallback_products, sort_by_display_order};
use mousse_melts_core::{AppSettings, Coupon, Product, Stats};

use super::{Document, DocumentStore, RepositoryError};

/// Collection names.
pub mod collections {
    pub const PRODUCTS: &str = "products";
    pub const COUPONS: &str = "coupons";
    pub const CONFIG: &str = "config";
    pub const STATS: &str = "stats";
}

const SETTINGS_ID: &str = "main_settings";
const STATS_ID: &str = "general";
const VISITS_FIELD: &str = "totalVisits";
const LEADS_FIELD: &str = "leadsGenerated";

/// Repository for products, settings, coupons, and counters.
///
/// Cheaply cloneable; all clones share the same store.
#[derive(Clone)]
pub struct CatalogRepository {
    store: Arc<dyn DocumentStore>,
}

impl CatalogRepository {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// The underlying document store.
    #[must_use]
    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Products in display order.
    ///
    /// An empty collection yields the fallback products. Malformed documents
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let mut products: Vec<Product> = decode_collection(
            collections::PRODUCTS,
            self.store.list(collections::PRODUCTS).await?,
        );

        if products.is_empty() {
            return Ok(fallback_products());
        }
        sort_by_display_order(&mut products);
        Ok(products)
    }

    /// Replace the stored products with `products`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if encoding or the write fails.
    #[instrument(skip(self, products), fields(count = products.len()))]
    pub async fn save_products(&self, products: &[Product]) -> Result<(), RepositoryError> {
        let documents = encode_collection(products, |product| product.id.to_string())?;
        self.store
            .replace_all(collections::PRODUCTS, documents)
            .await
    }

    /// Settings merged over the defaults. A missing document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    #[instrument(skip(self))]
    pub async fn fetch_settings(&self) -> Result<AppSettings, RepositoryError> {
        let stored = self.store.get(collections::CONFIG, SETTINGS_ID).await?;
        Ok(stored.map_or_else(AppSettings::default, |value| {
            AppSettings::merged_with_defaults(&value)
        }))
    }

    /// Overwrite the settings document.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if encoding or the write fails.
    #[instrument(skip(self, settings))]
    pub async fn save_settings(&self, settings: &AppSettings) -> Result<(), RepositoryError> {
        let data = serde_json::to_value(settings)?;
        self.store.put(collections::CONFIG, SETTINGS_ID, data).await
    }

    /// Counters plus the number of stored products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    #[instrument(skip(self))]
    pub async fn fetch_stats(&self) -> Result<Stats, RepositoryError> {
        let (counters, product_count) = tokio::try_join!(
            self.store.get(collections::STATS, STATS_ID),
            self.store.count(collections::PRODUCTS),
        )?;

        let mut stats = counters
            .and_then(|value| serde_json::from_value::<Stats>(value).ok())
            .unwrap_or_default();
        stats.active_products = product_count;
        Ok(stats)
    }

    /// Count one visit.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the write fails.
    #[instrument(skip(self))]
    pub async fn increment_visits(&self) -> Result<(), RepositoryError> {
        self.store
            .increment(collections::STATS, STATS_ID, VISITS_FIELD, 1)
            .await
    }

    /// Count one lead.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the write fails.
    #[instrument(skip(self))]
    pub async fn increment_leads(&self) -> Result<(), RepositoryError> {
        self.store
            .increment(collections::STATS, STATS_ID, LEADS_FIELD, 1)
            .await
    }

    /// All stored coupons.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    #[instrument(skip(self))]
    pub async fn fetch_coupons(&self) -> Result<Vec<Coupon>, RepositoryError> {
        Ok(decode_collection(
            collections::COUPONS,
            self.store.list(collections::COUPONS).await?,
        ))
    }

    /// Replace the stored coupons with `coupons`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if encoding or the write fails.
    #[instrument(skip(self, coupons), fields(count = coupons.len()))]
    pub async fn save_coupons(&self, coupons: &[Coupon]) -> Result<(), RepositoryError> {
        let documents = encode_collection(coupons, |coupon| coupon.id.to_string())?;
        self.store.replace_all(collections::COUPONS, documents).await
    }

    /// Delete every product. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the write fails.
    pub async fn clear_products(&self) -> Result<u64, RepositoryError> {
        self.store.delete_all(collections::PRODUCTS).await
    }

    /// Store a single product without touching the others.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if encoding or the write fails.
    pub async fn put_product(&self, product: &Product) -> Result<(), RepositoryError> {
        let data = serde_json::to_value(product)?;
        self.store
            .put(collections::PRODUCTS, product.id.as_str(), data)
            .await
    }
}

/// Decode each document, using the document key as the record's `id`.
fn decode_collection<T: DeserializeOwned>(collection: &str, documents: Vec<Document>) -> Vec<T> {
    documents
        .into_iter()
        .filter_map(|Document { id, mut data }| {
            if let Some(fields) = data.as_object_mut() {
                fields.insert("id".to_string(), Value::String(id.clone()));
            }
            serde_json::from_value(data)
                .inspect_err(|e| {
                    tracing::warn!(collection, id = %id, error = %e, "Skipping malformed document");
                })
                .ok()
        })
        .collect()
}

fn encode_collection<T: Serialize>(
    records: &[T],
    key: impl Fn(&T) -> String,
) -> Result<Vec<Document>, RepositoryError> {
    records
        .iter()
        .map(|record| Ok(Document::new(key(record), serde_json::to_value(record)?)))
        .collect()
}
