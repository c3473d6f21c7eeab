//! Session-stored types.
//!
//! The cart record has its own module ([`crate::cart`]); everything else
//! the storefront stashes in the session lives here.

use serde::{Deserialize, Serialize};

use crate::shop_api::OrderReceipt;

/// Confirmation stashed between order submission and the success page.
///
/// Written by `POST /checkout` on success, consumed (removed) by
/// `GET /checkout/success`. Holds only what the service returned plus the
/// display name of the chosen region; the cart itself is already gone by
/// the time this exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// The service's receipt for the committed order.
    pub receipt: OrderReceipt,
    /// Display name of the delivery region the customer picked.
    pub region_name: String,
}

/// Session keys for storefront data.
pub mod keys {
    /// Key for the pending order confirmation.
    pub const ORDER_CONFIRMATION: &str = "order_confirmation";
}
