//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::events::CartEvents;
use crate::shop::ShopClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration, the shop service
/// client and the cart event channel. There is deliberately no cart cache
/// in here - the shop service is the source of truth and every request
/// re-fetches.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    shop: ShopClient,
    events: CartEvents,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let shop = ShopClient::new(config.shop_url.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                shop,
                events: CartEvents::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the shop service client.
    #[must_use]
    pub fn shop(&self) -> &ShopClient {
        &self.inner.shop
    }

    /// Get a reference to the cart event channel.
    #[must_use]
    pub fn events(&self) -> &CartEvents {
        &self.inner.events
    }
}
