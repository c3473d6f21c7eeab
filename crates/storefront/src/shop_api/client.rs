//! Shop service HTTP client implementation.
//!
//! Thin typed wrapper over `reqwest`: one method per endpoint, wire structs
//! decoded and converted at the boundary. Mutable state (orders, contact
//! messages) is never cached; read endpoints are fetched fresh on every
//! call.

use std::sync::Arc;

use amara_core::types::{Price, ProductId, RegionId};
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::config::ShopApiConfig;

use super::ShopApiError;
use super::types::{
    ContactRequest, OrderReceipt, OrderRequest, Product, Region, WireContactResponse,
    WireErrorBody, WireOrderReceipt, WireProduct, WireRegion, WireShippingQuote,
};

/// Client for the shop service API.
///
/// Cheaply cloneable; all clones share one connection pool.
#[derive(Clone)]
pub struct ShopApiClient {
    inner: Arc<ShopApiClientInner>,
}

struct ShopApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl ShopApiClient {
    /// Create a new shop service client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ShopApiConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ShopApiClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            }),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Decode a response, mapping non-success statuses to typed errors.
    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
        what: &str,
    ) -> Result<T, ShopApiError> {
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ShopApiError::NotFound(what.to_string()));
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<WireErrorBody>(&body)
                .ok()
                .and_then(|err| err.message);
            tracing::warn!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "shop API returned non-success status"
            );
            return Err(ShopApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "failed to parse shop API response"
            );
            ShopApiError::Parse(e)
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        what: &str,
    ) -> Result<T, ShopApiError> {
        let response = self.inner.client.get(self.endpoint(path)).send().await?;
        Self::decode(response, what).await
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List the full product catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ShopApiError> {
        let wire: Vec<WireProduct> = self.get_json("/api/products", "products").await?;
        Ok(wire.into_iter().map(Product::from).collect())
    }

    /// List bestseller products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    #[instrument(skip(self))]
    pub async fn bestsellers(&self) -> Result<Vec<Product>, ShopApiError> {
        let wire: Vec<WireProduct> = self
            .get_json("/api/products/bestsellers", "bestsellers")
            .await?;
        Ok(wire.into_iter().map(Product::from).collect())
    }

    /// Get a single product by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown ID, or another error if the
    /// request or decoding fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: &ProductId) -> Result<Product, ShopApiError> {
        let wire: WireProduct = self
            .get_json(
                &format!("/api/products/{product_id}"),
                &format!("product {product_id}"),
            )
            .await?;
        Ok(wire.into())
    }

    // =========================================================================
    // Shipping Methods
    // =========================================================================

    /// List delivery regions with their shipping fees.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails. Callers fall
    /// back to [`crate::shipping::fallback_regions`] on failure.
    #[instrument(skip(self))]
    pub async fn list_regions(&self) -> Result<Vec<Region>, ShopApiError> {
        let wire: Vec<WireRegion> = self.get_json("/api/shipping/governorates", "regions").await?;
        Ok(wire.into_iter().map(Region::from).collect())
    }

    /// Resolve the shipping fee for a region.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails. Callers fall
    /// back to [`crate::shipping::fallback_fee`] on failure.
    #[instrument(skip(self), fields(region_id = %region_id))]
    pub async fn shipping_cost(&self, region_id: RegionId) -> Result<Price, ShopApiError> {
        let wire: WireShippingQuote = self
            .get_json(
                &format!("/api/shipping/shipping-cost/{region_id}"),
                &format!("shipping cost for region {region_id}"),
            )
            .await?;
        Ok(wire.fee())
    }

    // =========================================================================
    // Write Methods (never cached, never retried)
    // =========================================================================

    /// Submit an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the service rejects the order or the request
    /// fails; the caller must leave the cart untouched in that case.
    #[instrument(skip(self, order), fields(items = order.items.len()))]
    pub async fn create_order(&self, order: &OrderRequest) -> Result<OrderReceipt, ShopApiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("/api/orders"))
            .json(order)
            .send()
            .await?;

        let wire: WireOrderReceipt = Self::decode(response, "order").await?;
        Ok(wire.into())
    }

    /// Submit a contact message.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` when the service answers 2xx but reports
    /// failure, or another error if the request fails.
    #[instrument(skip(self, message), fields(subject = %message.subject))]
    pub async fn send_contact_message(
        &self,
        message: &ContactRequest,
    ) -> Result<(), ShopApiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("/api/contact"))
            .json(message)
            .send()
            .await?;

        let wire: WireContactResponse = Self::decode(response, "contact message").await?;

        if wire.success {
            Ok(())
        } else {
            Err(ShopApiError::Rejected(wire.message.unwrap_or_else(|| {
                "contact message was not accepted".to_string()
            })))
        }
    }
}
