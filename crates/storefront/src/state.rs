//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::services::auth::AdminCredentials;
use crate::services::catalog::CatalogState;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog snapshot, the admin credentials, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogState,
    credentials: AdminCredentials,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Shared catalog state over the configured document store
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: CatalogState) -> Self {
        let credentials = AdminCredentials::new(&config.admin);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                credentials,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog state.
    #[must_use]
    pub fn catalog(&self) -> &CatalogState {
        &self.inner.catalog
    }

    /// Get a reference to the admin credentials.
    #[must_use]
    pub fn credentials(&self) -> &AdminCredentials {
        &self.inner.credentials
    }
}
