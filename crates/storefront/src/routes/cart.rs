//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! All reads and mutations go through [`SessionCart`]; handlers only
//! gate stock and shape view data. Every mutation response carries the
//! cart-updated trigger so the header badge re-reads its count.

use amara_core::cart::Cart;
use amara_core::types::ProductId;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::SessionCart;
use crate::error::Result;
use crate::filters;
use crate::shop_api::Product;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub selected_size: Option<String>,
    pub quantity: u32,
    /// Stock recorded for the chosen size at add time; gates the stepper.
    pub available: u32,
    pub price: String,
    pub line_total: String,
    pub image: String,
    pub bestseller: bool,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: amara_core::types::Price::ZERO.to_string(),
            item_count: 0,
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart
                .lines()
                .iter()
                .map(|line| CartItemView {
                    product_id: line.product.id.to_string(),
                    name: line.product.name.clone(),
                    selected_size: line.selected_size.clone(),
                    quantity: line.quantity,
                    available: line.product.available,
                    price: line.product.price.to_string(),
                    line_total: line.line_total().to_string(),
                    image: line.product.image.clone(),
                    bestseller: line.product.bestseller,
                })
                .collect(),
            subtotal: cart.total_price().to_string(),
            item_count: cart.total_items(),
        }
    }
}

// =============================================================================
// Form Data
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub size: Option<String>,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub size: Option<String>,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
    pub size: Option<String>,
}

/// HTML selects submit `size=""` for the no-size case; the cart model
/// wants `None` there.
fn normalize_size(size: Option<String>) -> Option<String> {
    size.filter(|s| !s.is_empty())
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Add-to-cart result fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/add_result.html")]
pub struct AddResultTemplate {
    pub ok: bool,
    pub message: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> impl IntoResponse {
    let cart = SessionCart::new(session).load().await;

    CartShowTemplate {
        cart: CartView::from(&cart),
    }
}

/// Check an add request against the product's stock.
///
/// The cart model itself accepts any quantity; this page-level gate is
/// where size/stock validity lives. The cumulative check counts what the
/// cart already holds for the same (product, size) line.
fn check_stock(
    product: &Product,
    cart: &Cart,
    selected_size: Option<&str>,
    quantity: u32,
) -> std::result::Result<(), String> {
    if product.has_sizes() && selected_size.is_none() {
        return Err("Please choose a size first.".to_string());
    }

    let stock = product.stock_for(selected_size);
    if stock == 0 {
        return Err(match selected_size {
            Some(size) => format!("Size {size} is sold out."),
            None => "This product is sold out.".to_string(),
        });
    }

    if quantity > stock {
        return Err(format!("Only {stock} left in stock."));
    }

    let already_in_cart = cart.quantity_of_line(&product.id, selected_size);
    if already_in_cart.saturating_add(quantity) > stock {
        return Err(format!(
            "Your cart already holds {already_in_cart} of this item; only {stock} available."
        ));
    }

    Ok(())
}

/// Add item to cart (HTMX).
///
/// Re-fetches the product, gates the request against its stock, then
/// merges into the session cart. Returns an inline result fragment; the
/// cart-updated trigger fires only when the cart actually changed.
#[instrument(skip(state, session), fields(product_id = %form.product_id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product_id = ProductId::new(form.product_id);
    let selected_size = normalize_size(form.size);
    let quantity = form.quantity.unwrap_or(1).max(1);

    let product = match state.shop_api().get_product(&product_id).await {
        Ok(product) => product,
        Err(e) => {
            tracing::warn!("failed to fetch product for add-to-cart: {e}");
            return Ok(AddResultTemplate {
                ok: false,
                message: "Could not reach the shop right now. Please try again.".to_string(),
            }
            .into_response());
        }
    };

    let session_cart = SessionCart::new(session);
    let cart = session_cart.load().await;

    if let Err(message) = check_stock(&product, &cart, selected_size.as_deref(), quantity) {
        return Ok(AddResultTemplate { ok: false, message }.into_response());
    }

    let snapshot = product.snapshot_for(selected_size.as_deref());
    session_cart.add(snapshot, quantity, selected_size).await?;

    Ok((
        SessionCart::updated_trigger(),
        AddResultTemplate {
            ok: true,
            message: format!("Added \"{}\" to your cart.", product.name),
        },
    )
        .into_response())
}

/// Update cart item quantity (HTMX).
///
/// A quantity of zero removes the line.
#[instrument(skip(session), fields(product_id = %form.product_id))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Response> {
    let product_id = ProductId::new(form.product_id);
    let selected_size = normalize_size(form.size);

    let cart = SessionCart::new(session)
        .set_quantity(&product_id, selected_size.as_deref(), form.quantity)
        .await?;

    Ok((
        SessionCart::updated_trigger(),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response())
}

/// Remove item from cart (HTMX).
#[instrument(skip(session), fields(product_id = %form.product_id))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Response> {
    let product_id = ProductId::new(form.product_id);
    let selected_size = normalize_size(form.size);

    let cart = SessionCart::new(session)
        .remove(&product_id, selected_size.as_deref())
        .await?;

    Ok((
        SessionCart::updated_trigger(),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response())
}

/// Get cart count badge (HTMX).
///
/// The header badge subscribes to the cart-updated event and re-reads the
/// whole record here - broadcast then full re-read, never a diff.
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = SessionCart::new(session).load().await;

    CartCountTemplate {
        count: cart.total_items(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use amara_core::types::Price;
    use crate::shop_api::{SizeVariant, Stock};

    fn sized_product(stock_m: u32) -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Linen Dress".to_string(),
            description: String::new(),
            price: Price::from_pounds(550),
            image: String::new(),
            bestseller: false,
            stock: Stock::Sized {
                sizes: vec![SizeVariant {
                    label: "M".to_string(),
                    quantity: stock_m,
                }],
            },
        }
    }

    #[test]
    fn test_check_stock_requires_size_for_sized_product() {
        let cart = Cart::new();
        assert!(check_stock(&sized_product(5), &cart, None, 1).is_err());
        assert!(check_stock(&sized_product(5), &cart, Some("M"), 1).is_ok());
    }

    #[test]
    fn test_check_stock_rejects_over_request() {
        let cart = Cart::new();
        assert!(check_stock(&sized_product(2), &cart, Some("M"), 3).is_err());
        assert!(check_stock(&sized_product(2), &cart, Some("M"), 2).is_ok());
    }

    #[test]
    fn test_check_stock_counts_existing_line() {
        let product = sized_product(3);
        let mut cart = Cart::new();
        cart.add(product.snapshot_for(Some("M")), 2, Some("M".to_string()));

        // 2 in cart + 2 requested > 3 in stock
        assert!(check_stock(&product, &cart, Some("M"), 2).is_err());
        assert!(check_stock(&product, &cart, Some("M"), 1).is_ok());
    }

    #[test]
    fn test_check_stock_sold_out_size() {
        let cart = Cart::new();
        let err = check_stock(&sized_product(0), &cart, Some("M"), 1).unwrap_err();
        assert!(err.contains("sold out"));
    }

    #[test]
    fn test_normalize_size() {
        assert_eq!(normalize_size(Some(String::new())), None);
        assert_eq!(normalize_size(None), None);
        assert_eq!(normalize_size(Some("M".to_string())), Some("M".to_string()));
    }
}
