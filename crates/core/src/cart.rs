//! The shopping cart aggregate.
//!
//! A [`Cart`] is an ordered collection of [`CartLine`]s. Line identity is
//! the pair (product id, selected size): the same product in two sizes is
//! two lines, and a product without size variants carries the implicit
//! `None` size. The aggregate enforces two invariants:
//!
//! - no two lines share an identity - adding an existing identity merges
//!   quantities instead of appending a duplicate;
//! - a line's quantity is always >= 1 - setting it to zero removes the
//!   line rather than storing it.
//!
//! The aggregate is pure: persistence and change notification live in the
//! storefront's cart store, which serializes the whole line list as one
//! record after every mutation.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// The slice of a product a cart line carries.
///
/// A snapshot is taken when the line is created; later catalog edits do
/// not rewrite lines already in the cart. `available` records the stock of
/// the chosen size at add time and is used only to gate quantity steppers
/// in the cart view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Server-owned product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Image URL.
    pub image: String,
    /// Whether the product was flagged as a bestseller.
    #[serde(default)]
    pub bestseller: bool,
    /// Stock on hand for the chosen size when the line was created.
    #[serde(default)]
    pub available: u32,
}

/// One (product, size, quantity) entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product snapshot taken when the line was created.
    pub product: ProductSnapshot,
    /// Units of this product/size in the cart. Always >= 1.
    pub quantity: u32,
    /// Selected size label, `None` for products without size variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<String>,
}

impl CartLine {
    /// Whether this line has the identity (product_id, selected_size).
    fn is(&self, product_id: &ProductId, selected_size: Option<&str>) -> bool {
        self.product.id == *product_id && self.selected_size.as_deref() == selected_size
    }

    /// Price of the whole line (unit price x quantity).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// An ordered collection of cart lines, insertion order preserved.
///
/// Serializes transparently as the line array - the exact shape of the
/// persisted cart record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Rebuild a cart from a persisted line array.
    ///
    /// Lines that violate the quantity invariant (persisted by an older or
    /// foreign writer) are dropped rather than surfaced.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            if line.quantity >= 1 {
                cart.add(line.product, line.quantity, line.selected_size);
            }
        }
        cart
    }

    /// Add `quantity` units of a product/size to the cart.
    ///
    /// If a line with the same (product, size) identity already exists its
    /// quantity grows by `quantity`; otherwise a new line is appended at
    /// the end. Stock bounds are the caller's responsibility - the
    /// aggregate accepts whatever quantity it is given.
    pub fn add(&mut self, product: ProductSnapshot, quantity: u32, selected_size: Option<String>) {
        if quantity == 0 {
            return;
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.is(&product.id, selected_size.as_deref()))
        {
            line.quantity = line.quantity.saturating_add(quantity);
            // Refresh the stock snapshot so the cart view gates against
            // the latest figure the caller saw.
            line.product.available = product.available;
        } else {
            self.lines.push(CartLine {
                product,
                quantity,
                selected_size,
            });
        }
    }

    /// Replace the quantity of the line with the given identity.
    ///
    /// A quantity of zero removes the line entirely. A missing identity is
    /// a no-op.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        selected_size: Option<&str>,
        quantity: u32,
    ) {
        if quantity == 0 {
            self.remove(product_id, selected_size);
            return;
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.is(product_id, selected_size))
        {
            line.quantity = quantity;
        }
    }

    /// Drop the line with the given identity, if present.
    pub fn remove(&mut self, product_id: &ProductId, selected_size: Option<&str>) {
        self.lines.retain(|line| !line.is(product_id, selected_size));
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// True when the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines (unique identities).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |total, line| total.saturating_add(line.quantity))
    }

    /// Sum of price x quantity across all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Whether any line (any size) holds the given product.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.lines.iter().any(|line| line.product.id == *product_id)
    }

    /// Units of the given product across all sizes.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.lines
            .iter()
            .filter(|line| line.product.id == *product_id)
            .fold(0, |total, line| total.saturating_add(line.quantity))
    }

    /// Units already in the cart for one exact (product, size) identity.
    #[must_use]
    pub fn quantity_of_line(&self, product_id: &ProductId, selected_size: Option<&str>) -> u32 {
        self.lines
            .iter()
            .find(|line| line.is(product_id, selected_size))
            .map_or(0, |line| line.quantity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn snapshot(id: &str, pounds: i64) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::from_pounds(pounds),
            image: format!("/images/{id}.jpg"),
            bestseller: false,
            available: 10,
        }
    }

    fn assert_no_duplicate_identities(cart: &Cart) {
        for (i, a) in cart.lines().iter().enumerate() {
            for b in cart.lines().iter().skip(i + 1) {
                assert!(
                    !(a.product.id == b.product.id && a.selected_size == b.selected_size),
                    "duplicate identity: {:?} / {:?}",
                    a.product.id,
                    a.selected_size
                );
            }
        }
    }

    #[test]
    fn test_add_merges_same_identity() {
        let mut cart = Cart::new();
        cart.add(snapshot("p1", 350), 2, Some("M".into()));
        cart.add(snapshot("p1", 350), 3, Some("M".into()));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
        assert_no_duplicate_identities(&cart);
    }

    #[test]
    fn test_sizes_are_distinct_identities() {
        let mut cart = Cart::new();
        cart.add(snapshot("p1", 350), 1, Some("M".into()));
        cart.add(snapshot("p1", 350), 1, Some("L".into()));
        cart.add(snapshot("p1", 350), 1, None);

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.quantity_of(&ProductId::new("p1")), 3);
        assert_no_duplicate_identities(&cart);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add(snapshot("a", 100), 1, None);
        cart.add(snapshot("b", 200), 1, None);
        cart.add(snapshot("a", 100), 4, None);

        let ids: Vec<&str> = cart
            .lines()
            .iter()
            .map(|line| line.product.id.as_str())
            .collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add(snapshot("p1", 350), 2, Some("M".into()));
        cart.set_quantity(&ProductId::new("p1"), Some("M"), 0);

        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_on_missing_identity_is_noop() {
        let mut cart = Cart::new();
        cart.add(snapshot("p1", 350), 2, Some("M".into()));
        cart.set_quantity(&ProductId::new("p1"), Some("XL"), 7);
        cart.set_quantity(&ProductId::new("ghost"), None, 7);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_set_quantity_replaces() {
        let mut cart = Cart::new();
        cart.add(snapshot("p1", 350), 2, None);
        cart.set_quantity(&ProductId::new("p1"), None, 9);

        assert_eq!(cart.lines()[0].quantity, 9);
    }

    #[test]
    fn test_remove_is_unconditional_and_exact() {
        let mut cart = Cart::new();
        cart.add(snapshot("p1", 350), 2, Some("M".into()));
        cart.add(snapshot("p1", 350), 1, Some("L".into()));
        cart.remove(&ProductId::new("p1"), Some("M"));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].selected_size.as_deref(), Some("L"));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(snapshot("p1", 350), 2, None);
        cart.add(snapshot("p2", 100), 1, None);
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Price::ZERO);
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add(snapshot("p1", 350), 2, Some("M".into()));
        cart.add(snapshot("p2", 120), 3, None);

        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.total_price(), Price::from_pounds(350 * 2 + 120 * 3));
    }

    #[test]
    fn test_totals_empty_cart() {
        let cart = Cart::new();
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Price::ZERO);
    }

    #[test]
    fn test_membership_and_quantity_lookup() {
        let mut cart = Cart::new();
        cart.add(snapshot("p1", 350), 2, Some("M".into()));
        cart.add(snapshot("p1", 350), 1, Some("L".into()));

        let p1 = ProductId::new("p1");
        assert!(cart.contains(&p1));
        assert!(!cart.contains(&ProductId::new("p2")));
        assert_eq!(cart.quantity_of(&p1), 3);
        assert_eq!(cart.quantity_of_line(&p1, Some("M")), 2);
        assert_eq!(cart.quantity_of_line(&p1, Some("S")), 0);
    }

    #[test]
    fn test_add_zero_quantity_is_noop() {
        let mut cart = Cart::new();
        cart.add(snapshot("p1", 350), 0, None);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_no_duplicates_across_random_operation_sequence() {
        let mut cart = Cart::new();
        for i in 0..50_u32 {
            let id = format!("p{}", i % 5);
            let size = match i % 3 {
                0 => None,
                1 => Some("M".to_owned()),
                _ => Some("L".to_owned()),
            };
            match i % 4 {
                0 | 1 => cart.add(snapshot(&id, 100), 1 + i % 3, size),
                2 => cart.set_quantity(&ProductId::new(id), size.as_deref(), i % 4),
                _ => cart.remove(&ProductId::new(id), size.as_deref()),
            }
            assert_no_duplicate_identities(&cart);
            assert!(cart.lines().iter().all(|line| line.quantity >= 1));
        }
    }

    #[test]
    fn test_serde_roundtrip_is_a_plain_array() {
        let mut cart = Cart::new();
        cart.add(snapshot("p1", 350), 2, Some("M".into()));

        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());

        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn test_from_lines_drops_zero_quantity_and_merges_duplicates() {
        let lines = vec![
            CartLine {
                product: snapshot("p1", 350),
                quantity: 2,
                selected_size: Some("M".into()),
            },
            CartLine {
                product: snapshot("p1", 350),
                quantity: 0,
                selected_size: Some("L".into()),
            },
            CartLine {
                product: snapshot("p1", 350),
                quantity: 3,
                selected_size: Some("M".into()),
            },
        ];

        let cart = Cart::from_lines(lines);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
    }
}
