//! Session-backed cart store.
//!
//! [`SessionCart`] is the single choke point for cart state: every page
//! that reads or mutates the cart goes through it, which is what keeps the
//! no-duplicate-identity invariant intact. One record lives in the browser
//! session under a key private to this module; every mutation rewrites the
//! whole record and answers with the `cart-updated` trigger so subscribed
//! fragments (the header badge, the cart panel) re-read everything.
//!
//! Tabs of one browser share the session record. There is no locking and
//! no merge: concurrent mutations are read-modify-write and the last
//! writer wins.

use amara_core::cart::{Cart, CartLine, ProductSnapshot};
use amara_core::types::ProductId;
use axum::response::AppendHeaders;
use tower_sessions::Session;

/// Session key holding the serialized cart line array.
///
/// Private by design: consumers go through [`SessionCart`], never the
/// session directly.
const CART_KEY: &str = "cart";

/// Name of the client-side event fired after every cart mutation.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Errors from the underlying session store.
///
/// Reads never produce these - a missing or malformed record loads as an
/// empty cart. Only persisting a mutation can fail.
#[derive(Debug, thiserror::Error)]
pub enum CartStoreError {
    #[error("failed to persist cart: {0}")]
    Persist(#[from] tower_sessions::session::Error),
}

/// Handle to the cart record of one browser session.
#[derive(Debug, Clone)]
pub struct SessionCart {
    session: Session,
}

impl SessionCart {
    /// Wrap the request's session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Load the cart from the session record.
    ///
    /// An absent or malformed record loads as an empty cart; this never
    /// fails and never surfaces corruption to the user. Rebuilding through
    /// [`Cart::from_lines`] also re-establishes the aggregate invariants
    /// against a record written by an older build.
    pub async fn load(&self) -> Cart {
        self.session
            .get::<Vec<CartLine>>(CART_KEY)
            .await
            .ok()
            .flatten()
            .map_or_else(Cart::new, Cart::from_lines)
    }

    /// Rewrite the whole record.
    async fn persist(&self, cart: &Cart) -> Result<(), CartStoreError> {
        self.session.insert(CART_KEY, cart).await?;
        Ok(())
    }

    /// Add units of a product/size, merging into an existing line.
    ///
    /// Stock bounds are the caller's responsibility; the store persists
    /// whatever quantity it is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the session record cannot be written; the
    /// record then still holds the pre-mutation cart.
    pub async fn add(
        &self,
        product: ProductSnapshot,
        quantity: u32,
        selected_size: Option<String>,
    ) -> Result<Cart, CartStoreError> {
        let mut cart = self.load().await;
        cart.add(product, quantity, selected_size);
        self.persist(&cart).await?;
        Ok(cart)
    }

    /// Replace a line's quantity; zero drops the line.
    ///
    /// # Errors
    ///
    /// Returns an error if the session record cannot be written.
    pub async fn set_quantity(
        &self,
        product_id: &ProductId,
        selected_size: Option<&str>,
        quantity: u32,
    ) -> Result<Cart, CartStoreError> {
        let mut cart = self.load().await;
        cart.set_quantity(product_id, selected_size, quantity);
        self.persist(&cart).await?;
        Ok(cart)
    }

    /// Drop a line unconditionally.
    ///
    /// # Errors
    ///
    /// Returns an error if the session record cannot be written.
    pub async fn remove(
        &self,
        product_id: &ProductId,
        selected_size: Option<&str>,
    ) -> Result<Cart, CartStoreError> {
        let mut cart = self.load().await;
        cart.remove(product_id, selected_size);
        self.persist(&cart).await?;
        Ok(cart)
    }

    /// Empty the cart and delete the record entirely.
    ///
    /// The session keeps no empty-array tombstone; a later [`load`]
    /// finds nothing and starts fresh.
    ///
    /// [`load`]: Self::load
    ///
    /// # Errors
    ///
    /// Returns an error if the session record cannot be removed.
    pub async fn clear(&self) -> Result<(), CartStoreError> {
        self.session.remove_value(CART_KEY).await?;
        Ok(())
    }

    /// Response headers announcing a cart change to subscribed fragments.
    ///
    /// This is a broadcast, not a diff: every mutation fires the same
    /// event and every subscriber re-reads the whole cart.
    #[must_use]
    pub const fn updated_trigger() -> AppendHeaders<[(&'static str, &'static str); 1]> {
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)])
    }
}
