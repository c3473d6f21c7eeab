//! Shop service API client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP via `reqwest`; the shop service is the source of
//!   truth for products, regions, and orders - no local sync, no caching,
//!   one fetch per page mount
//! - Wire structs mirror the service's camelCase payloads and are converted
//!   to domain types at the boundary
//! - No automatic retries; every failure is reported once to the caller
//!
//! # Example
//!
//! ```rust,ignore
//! use amara_storefront::shop_api::ShopApiClient;
//!
//! let client = ShopApiClient::new(&config.shop_api)?;
//!
//! let bestsellers = client.bestsellers().await?;
//! let product = client.get_product(&product_id).await?;
//! ```

mod client;
pub mod types;

pub use client::ShopApiClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the shop service.
#[derive(Debug, Error)]
pub enum ShopApiError {
    /// Connection, TLS, or timeout failure before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("shop API returned {status}{}", format_server_message(.message))]
    Status {
        /// HTTP status code.
        status: u16,
        /// `message` field from the error body, when the service sent one.
        message: Option<String>,
    },

    /// The response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The service answered 2xx but reported failure in the body.
    #[error("rejected by shop API: {0}")]
    Rejected(String),
}

impl ShopApiError {
    /// The human-readable message the service attached to a failure, if any.
    ///
    /// Checkout surfaces this to the customer in preference to a generic
    /// error line.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status {
                message: Some(msg), ..
            }
            | Self::Rejected(msg) => Some(msg),
            _ => None,
        }
    }
}

fn format_server_message(message: &Option<String>) -> String {
    message
        .as_ref()
        .map_or_else(String::new, |msg| format!(": {msg}"))
}
