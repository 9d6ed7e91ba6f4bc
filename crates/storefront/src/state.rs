//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::{ApiError, CatalogClient};
use crate::cart::{CartStore, FileStore, KeyValueStore};
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog client, the shopper's cart and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    cart: Mutex<CartStore>,
}

impl AppState {
    /// Create the state with the cart persisted in `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let storage = FileStore::new(&config.data_dir);
        Self::with_storage(config, storage)
    }

    /// Create the state with an explicit cart storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_storage(
        config: StorefrontConfig,
        storage: impl KeyValueStore + 'static,
    ) -> Result<Self, ApiError> {
        let catalog = CatalogClient::new(&config.api)?;
        let cart = Mutex::new(CartStore::load(storage));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// The shopper's cart. Never hold the guard across a backend call.
    #[must_use]
    pub fn cart(&self) -> &Mutex<CartStore> {
        &self.inner.cart
    }
}
