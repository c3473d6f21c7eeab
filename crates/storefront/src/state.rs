//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::shop_api::ShopApiClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration and the shop
/// service client. The cart lives in the session, not here.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    shop_api: ShopApiClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the shop API client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, reqwest::Error> {
        let shop_api = ShopApiClient::new(&config.shop_api)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, shop_api }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the shop service client.
    #[must_use]
    pub fn shop_api(&self) -> &ShopApiClient {
        &self.inner.shop_api
    }
}
