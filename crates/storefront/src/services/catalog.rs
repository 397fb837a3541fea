//! Process-wide catalog snapshot.
//!
//! Every page renders from the same snapshot of products, settings, stats,
//! and coupons. A refresh fetches all four collections at once and swaps the
//! snapshot only if every fetch succeeded.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::instrument;

use mousse_melts_core::catalog::fallback_products;
use mousse_melts_core::{AppSettings, Coupon, Product, Stats};

use crate::db::{CatalogRepository, RepositoryError};

/// An immutable view of the catalog at one point in time.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    pub settings: AppSettings,
    pub stats: Stats,
    pub coupons: Vec<Coupon>,
    /// Fingerprint of products, settings, and coupons; see [`content_revision`].
    pub revision: String,
}

impl Default for CatalogSnapshot {
    fn default() -> Self {
        let products = fallback_products();
        let settings = AppSettings::default();
        let coupons = Vec::new();
        Self {
            revision: content_revision(&products, &settings, &coupons),
            products,
            settings,
            stats: Stats::default(),
            coupons,
        }
    }
}

impl CatalogSnapshot {
    fn next(
        &self,
        products: Vec<Product>,
        settings: AppSettings,
        coupons: Vec<Coupon>,
        stats: Stats,
    ) -> Self {
        if self.products == products && self.settings == settings && self.coupons == coupons {
            return Self {
                stats,
                ..self.clone()
            };
        }
        Self {
            revision: content_revision(&products, &settings, &coupons),
            products,
            settings,
            stats,
            coupons,
        }
    }
}

/// SHA-256 of the editable catalog content, hex encoded.
///
/// The same stored content yields the same revision in every process, so a
/// draft kept in a persistent session is checked against what is stored now.
#[must_use]
pub fn content_revision(
    products: &[Product],
    settings: &AppSettings,
    coupons: &[Coupon],
) -> String {
    // Plain data types always serialize.
    let encoded = serde_json::to_vec(&(products, settings, coupons)).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(&encoded);
    format!("{:x}", hasher.finalize())
}

/// Shared catalog state.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct CatalogState {
    inner: Arc<CatalogStateInner>,
}

struct CatalogStateInner {
    repository: CatalogRepository,
    snapshot: RwLock<Arc<CatalogSnapshot>>,
    loading: AtomicBool,
}

impl CatalogState {
    /// Create state holding the defaults, marked as loading.
    #[must_use]
    pub fn new(repository: CatalogRepository) -> Self {
        Self {
            inner: Arc::new(CatalogStateInner {
                repository,
                snapshot: RwLock::new(Arc::new(CatalogSnapshot::default())),
                loading: AtomicBool::new(true),
            }),
        }
    }

    /// Get a reference to the catalog repository.
    #[must_use]
    pub fn repository(&self) -> &CatalogRepository {
        &self.inner.repository
    }

    /// The current snapshot.
    pub async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.inner.snapshot.read().await.clone()
    }

    /// Whether the first load has not finished yet.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.loading.load(Ordering::Acquire)
    }

    /// Load the first snapshot and clear the loading flag.
    ///
    /// If the store is unreachable the defaults stay in place.
    pub async fn initialize(&self) {
        if self.refresh().await.is_err() {
            tracing::warn!("Catalog unavailable at startup, serving defaults");
        }
        self.inner.loading.store(false, Ordering::Release);
    }

    /// Run [`CatalogState::initialize`] in the background.
    pub fn spawn_initialize(&self) -> JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move { state.initialize().await })
    }

    /// Re-fetch every collection and swap in the new snapshot.
    ///
    /// On failure the previous snapshot is kept.
    ///
    /// # Errors
    ///
    /// Returns the first `RepositoryError` encountered.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), RepositoryError> {
        let repo = &self.inner.repository;
        let (products, settings, stats, coupons) = tokio::try_join!(
            repo.fetch_products(),
            repo.fetch_settings(),
            repo.fetch_stats(),
            repo.fetch_coupons(),
        )
        .inspect_err(|e| tracing::error!(error = %e, "Catalog refresh failed"))?;

        let mut snapshot = self.inner.snapshot.write().await;
        let next = snapshot.next(products, settings, coupons, stats);
        tracing::debug!(revision = %next.revision, "Catalog refreshed");
        *snapshot = Arc::new(next);
        Ok(())
    }

    /// Install freshly saved data without a round trip to the store.
    pub async fn apply_saved(
        &self,
        products: Vec<Product>,
        settings: AppSettings,
        coupons: Vec<Coupon>,
    ) {
        let mut snapshot = self.inner.snapshot.write().await;
        let stats = snapshot.stats;
        let next = snapshot.next(products, settings, coupons, stats);
        *snapshot = Arc::new(next);
    }

    /// Count a new visitor in the background.
    pub fn record_visit(&self) -> JoinHandle<()> {
        let repository = self.inner.repository.clone();
        tokio::spawn(async move {
            if let Err(e) = repository.increment_visits().await {
                tracing::error!(error = %e, "Failed to record visit");
            }
        })
    }

    /// Count a checkout lead in the background, then refresh.
    pub fn record_checkout(&self) -> JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move {
            if let Err(e) = state.inner.repository.increment_leads().await {
                tracing::error!(error = %e, "Failed to record lead");
            }
            // Failures are logged by `refresh` itself.
            let _ = state.refresh().await;
        })
    }
}
