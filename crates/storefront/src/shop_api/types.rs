//! Shop service types.
//!
//! Domain types used by the routes, plus the wire-format structs the
//! service actually sends (camelCase, `_id` keys, prices as plain pound
//! numbers). Conversions happen here so nothing outside this module ever
//! touches a raw payload.

use amara_core::cart::ProductSnapshot;
use amara_core::types::{OrderId, Price, ProductId, RegionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Domain Types
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Server-owned ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Long description.
    pub description: String,
    /// Unit price.
    pub price: Price,
    /// Image URL.
    pub image: String,
    /// Server-flagged promotional attribute.
    pub bestseller: bool,
    /// Stock on hand, flat or per size.
    pub stock: Stock,
}

/// Stock shape: a flat count, or one count per size variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stock {
    /// Product without size variants.
    Simple {
        /// Units on hand.
        quantity: u32,
    },
    /// Product sold in sizes, each with its own count.
    Sized {
        /// Size variants in catalog order.
        sizes: Vec<SizeVariant>,
    },
}

/// One size variant of a sized product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeVariant {
    /// Size label, e.g. "M".
    pub label: String,
    /// Units on hand for this size.
    pub quantity: u32,
}

impl Product {
    /// Total units on hand: the flat count, or the sum over all sizes.
    #[must_use]
    pub fn total_stock(&self) -> u32 {
        match &self.stock {
            Stock::Simple { quantity } => *quantity,
            Stock::Sized { sizes } => sizes
                .iter()
                .fold(0, |total, size| total.saturating_add(size.quantity)),
        }
    }

    /// Units on hand for a given size selection.
    ///
    /// `None` selects the flat count; asking a sized product for `None`
    /// (or an unknown label) yields 0, as does asking a simple product
    /// for any size.
    #[must_use]
    pub fn stock_for(&self, selected_size: Option<&str>) -> u32 {
        match (&self.stock, selected_size) {
            (Stock::Simple { quantity }, None) => *quantity,
            (Stock::Sized { sizes }, Some(label)) => sizes
                .iter()
                .find(|size| size.label == label)
                .map_or(0, |size| size.quantity),
            _ => 0,
        }
    }

    /// Size variants that still have stock, in catalog order.
    #[must_use]
    pub fn available_sizes(&self) -> Vec<&SizeVariant> {
        match &self.stock {
            Stock::Simple { .. } => Vec::new(),
            Stock::Sized { sizes } => sizes.iter().filter(|size| size.quantity > 0).collect(),
        }
    }

    /// Whether the product is sold in sizes.
    #[must_use]
    pub const fn has_sizes(&self) -> bool {
        matches!(self.stock, Stock::Sized { .. })
    }

    /// Whether anything is left to sell.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.total_stock() > 0
    }

    /// The snapshot a cart line carries for this product and size choice.
    #[must_use]
    pub fn snapshot_for(&self, selected_size: Option<&str>) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
            bestseller: self.bestseller,
            available: self.stock_for(selected_size),
        }
    }
}

/// A delivery region with its fixed shipping fee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Catalog ID.
    pub id: RegionId,
    /// Display name.
    pub name: String,
    /// Flat shipping fee.
    pub fee: Price,
}

/// One (product, quantity) pair of an order payload.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    /// Product ID. Size and price snapshot are discarded; the service
    /// re-prices from its own catalog.
    pub product: ProductId,
    /// Units ordered.
    pub quantity: u32,
}

/// Order creation payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    /// Selected delivery region.
    pub governorate: RegionId,
    pub notes: String,
    pub items: Vec<OrderItem>,
}

/// What the service returns for a committed order.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OrderReceipt {
    /// Server-issued order ID.
    pub order_id: OrderId,
    /// Grand total including shipping, as computed by the service.
    pub total_amount: Price,
    /// Shipping fee the service charged.
    pub shipping_cost: Price,
    /// Customer name echoed back.
    pub customer_name: String,
    /// Commit timestamp.
    pub order_date: DateTime<Utc>,
}

/// Contact form payload.
#[derive(Debug, Clone, Serialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

// =============================================================================
// Wire Types
// =============================================================================

/// Convert a wire price (pounds, possibly fractional) into piasters.
///
/// The one place float currency is allowed: the service serializes pounds
/// as JSON numbers, so the boundary rounds to the nearest piaster and
/// everything downstream stays integral.
#[allow(clippy::cast_possible_truncation)]
fn pounds_to_price(pounds: f64) -> Price {
    Price::from_piasters((pounds * 100.0).round() as i64)
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireProduct {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    price: f64,
    #[serde(default)]
    image: String,
    #[serde(default)]
    bestseller: bool,
    #[serde(default)]
    quantity: Option<u32>,
    #[serde(default)]
    sizes: Option<Vec<WireSize>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireSize {
    size: String,
    quantity: u32,
}

impl From<WireProduct> for Product {
    fn from(wire: WireProduct) -> Self {
        // A `sizes` key, even an empty one, makes the product sized; the
        // flat count only applies in its absence.
        let stock = match wire.sizes {
            Some(sizes) => Stock::Sized {
                sizes: sizes
                    .into_iter()
                    .map(|size| SizeVariant {
                        label: size.size,
                        quantity: size.quantity,
                    })
                    .collect(),
            },
            None => Stock::Simple {
                quantity: wire.quantity.unwrap_or(0),
            },
        };

        Self {
            id: ProductId::new(wire.id),
            name: wire.name,
            description: wire.description,
            price: pounds_to_price(wire.price),
            image: wire.image,
            bestseller: wire.bestseller,
            stock,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireRegion {
    id: i32,
    name: String,
    shipping_cost: f64,
}

impl From<WireRegion> for Region {
    fn from(wire: WireRegion) -> Self {
        Self {
            id: RegionId::new(wire.id),
            name: wire.name,
            fee: pounds_to_price(wire.shipping_cost),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireShippingQuote {
    shipping_cost: f64,
}

impl WireShippingQuote {
    pub(crate) fn fee(&self) -> Price {
        pounds_to_price(self.shipping_cost)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireOrderReceipt {
    #[serde(rename = "_id")]
    id: String,
    total_amount: f64,
    shipping_cost: f64,
    customer_name: String,
    order_date: DateTime<Utc>,
}

impl From<WireOrderReceipt> for OrderReceipt {
    fn from(wire: WireOrderReceipt) -> Self {
        Self {
            order_id: OrderId::new(wire.id),
            total_amount: pounds_to_price(wire.total_amount),
            shipping_cost: pounds_to_price(wire.shipping_cost),
            customer_name: wire.customer_name,
            order_date: wire.order_date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireContactResponse {
    pub(crate) success: bool,
    #[serde(default)]
    pub(crate) message: Option<String>,
}

/// Error body the service attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct WireErrorBody {
    pub(crate) message: Option<String>,
}
