//! Checkout route handlers.
//!
//! Checkout is unreachable with an empty cart: both the page and the
//! submit handler redirect home before doing anything else. The region
//! catalog and the per-region fee degrade to the static fallback table
//! when the shop service is unreachable, so the form stays usable.
//!
//! Payment is cash on delivery; the submit handler posts the order, and
//! only a committed order clears the cart. Any failure re-renders the form
//! with the same input so the customer can retry.

use amara_core::cart::Cart;
use amara_core::types::{Phone, RegionId};
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::SessionCart;
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::{OrderConfirmation, session_keys};
use crate::shipping;
use crate::shop_api::{OrderItem, OrderRequest, Region};
use crate::state::AppState;

use super::cart::CartView;

/// Warning shown when the region catalog came from the fallback table.
const DEGRADED_REGIONS_NOTICE: &str =
    "Live shipping rates are unavailable right now; showing our standard rates.";

/// Generic failure line when the service gave no message of its own.
const GENERIC_ORDER_FAILURE: &str =
    "Something went wrong while placing your order. Please try again.";

/// Region display data for templates.
#[derive(Clone)]
pub struct RegionView {
    pub id: i32,
    pub name: String,
    pub fee: String,
}

impl From<&Region> for RegionView {
    fn from(region: &Region) -> Self {
        Self {
            id: region.id.as_i32(),
            name: region.name.clone(),
            fee: region.fee.to_string(),
        }
    }
}

/// Submitted form values, echoed back on validation or submission failure.
#[derive(Debug, Clone, Default)]
pub struct CheckoutFormView {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub region: Option<i32>,
    pub notes: String,
}

impl CheckoutFormView {
    /// Whether the given region option should render as selected.
    #[must_use]
    pub fn is_selected(&self, id: i32) -> bool {
        self.region == Some(id)
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub cart: CartView,
    pub regions: Vec<RegionView>,
    pub warning: Option<String>,
    pub error: Option<String>,
    pub form: CheckoutFormView,
}

/// Shipping quote fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/shipping_quote.html")]
pub struct ShippingQuoteTemplate {
    /// False until a known region is picked; the fee renders as a dash.
    pub resolved: bool,
    pub fee: String,
    pub subtotal: String,
    pub total: String,
}

/// Order success page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct OrderSuccessTemplate {
    pub order_id: String,
    pub customer_name: String,
    pub region_name: String,
    pub total_amount: String,
    pub shipping_cost: String,
    pub order_date: String,
}

/// Region-change form data.
#[derive(Debug, Deserialize)]
pub struct ShippingQuoteForm {
    #[serde(default)]
    pub region: String,
}

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub customer_address: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub notes: String,
}

impl CheckoutForm {
    fn to_view(&self) -> CheckoutFormView {
        CheckoutFormView {
            customer_name: self.customer_name.clone(),
            customer_phone: self.customer_phone.clone(),
            customer_address: self.customer_address.clone(),
            region: self.region.parse().ok(),
            notes: self.notes.clone(),
        }
    }

    /// Client-side validation per the checkout contract: all fields but
    /// notes are mandatory, the phone must be a valid Egyptian mobile.
    fn validate(&self) -> std::result::Result<(Phone, RegionId), String> {
        let region = self
            .region
            .parse::<i32>()
            .map(RegionId::new)
            .map_err(|_| "Please fill in all required fields.".to_string())?;

        if self.customer_name.trim().is_empty() || self.customer_address.trim().is_empty() {
            return Err("Please fill in all required fields.".to_string());
        }

        let phone = Phone::parse(self.customer_phone.trim())
            .map_err(|_| "Please enter a valid phone number (11 digits).".to_string())?;

        Ok((phone, region))
    }
}

/// Build the checkout page, fetching the region catalog.
async fn checkout_page(
    state: &AppState,
    cart: &Cart,
    form: CheckoutFormView,
    error: Option<String>,
) -> CheckoutTemplate {
    let regions = shipping::region_catalog(state.shop_api()).await;

    CheckoutTemplate {
        cart: CartView::from(cart),
        regions: regions.value.iter().map(RegionView::from).collect(),
        warning: regions
            .degraded
            .then(|| DEGRADED_REGIONS_NOTICE.to_string()),
        error,
        form,
    }
}

/// Display the checkout page.
///
/// Redirects home before rendering anything when the cart is empty.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Response {
    let cart = SessionCart::new(session).load().await;
    if cart.is_empty() {
        return Redirect::to("/").into_response();
    }

    checkout_page(&state, &cart, CheckoutFormView::default(), None)
        .await
        .into_response()
}

/// Resolve the shipping fee for the selected region (HTMX).
///
/// Fired on every region change; recomputes the order totals. An empty or
/// unknown selection renders an unresolved quote.
#[instrument(skip(state, session))]
pub async fn shipping_quote(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ShippingQuoteForm>,
) -> impl IntoResponse {
    let cart = SessionCart::new(session).load().await;
    let subtotal = cart.total_price();

    let fee = match form.region.parse::<i32>() {
        Ok(id) => {
            let resolved = shipping::shipping_fee(state.shop_api(), RegionId::new(id)).await;
            resolved.value
        }
        Err(_) => amara_core::types::Price::ZERO,
    };

    if fee.is_zero() {
        return ShippingQuoteTemplate {
            resolved: false,
            fee: String::new(),
            subtotal: subtotal.to_string(),
            total: subtotal.to_string(),
        };
    }

    ShippingQuoteTemplate {
        resolved: true,
        fee: fee.to_string(),
        subtotal: subtotal.to_string(),
        total: (subtotal + fee).to_string(),
    }
}

/// Submit the order.
///
/// On success the cart is cleared exactly once, the service's receipt is
/// stashed in the session, and the customer lands on the success page. On
/// any failure the cart is left untouched and the form re-renders with
/// the service's message when it sent one.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let session_cart = SessionCart::new(session.clone());
    let cart = session_cart.load().await;
    if cart.is_empty() {
        return Ok(Redirect::to("/").into_response());
    }

    let (phone, region) = match form.validate() {
        Ok(valid) => valid,
        Err(message) => {
            return Ok(checkout_page(&state, &cart, form.to_view(), Some(message))
                .await
                .into_response());
        }
    };

    let order = OrderRequest {
        customer_name: form.customer_name.trim().to_string(),
        customer_phone: phone.into_inner(),
        customer_address: form.customer_address.trim().to_string(),
        governorate: region,
        notes: form.notes.trim().to_string(),
        items: cart
            .lines()
            .iter()
            .map(|line| OrderItem {
                product: line.product.id.clone(),
                quantity: line.quantity,
            })
            .collect(),
    };

    match state.shop_api().create_order(&order).await {
        Ok(receipt) => {
            // The order is committed; the cart clears exactly once, now.
            session_cart.clear().await?;

            let region_name = shipping::fallback_regions()
                .into_iter()
                .find(|r| r.id == region)
                .map(|r| r.name)
                .unwrap_or_default();

            session
                .insert(
                    session_keys::ORDER_CONFIRMATION,
                    &OrderConfirmation {
                        receipt,
                        region_name,
                    },
                )
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?;

            Ok(Redirect::to("/checkout/success").into_response())
        }
        Err(e) => {
            tracing::warn!("order submission failed: {e}");
            let message = e
                .server_message()
                .map_or_else(|| GENERIC_ORDER_FAILURE.to_string(), ToString::to_string);

            Ok(checkout_page(&state, &cart, form.to_view(), Some(message))
                .await
                .into_response())
        }
    }
}

/// Display the order confirmation.
///
/// Consumes the stashed confirmation; refreshing the page or arriving
/// without one redirects home.
#[instrument(skip(session))]
pub async fn success(session: Session) -> Response {
    let confirmation: Option<OrderConfirmation> = session
        .remove(session_keys::ORDER_CONFIRMATION)
        .await
        .ok()
        .flatten();

    let Some(confirmation) = confirmation else {
        return Redirect::to("/").into_response();
    };

    OrderSuccessTemplate {
        order_id: confirmation.receipt.order_id.to_string(),
        customer_name: confirmation.receipt.customer_name,
        region_name: confirmation.region_name,
        total_amount: confirmation.receipt.total_amount.to_string(),
        shipping_cost: confirmation.receipt.shipping_cost.to_string(),
        order_date: confirmation
            .receipt
            .order_date
            .format("%-d %B %Y")
            .to_string(),
    }
    .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            customer_name: "Mona Hassan".to_string(),
            customer_phone: "01012345678".to_string(),
            customer_address: "12 Tahrir St, Downtown".to_string(),
            region: "1".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_validate_accepts_complete_form() {
        let (phone, region) = valid_form().validate().unwrap();
        assert_eq!(phone.as_str(), "01012345678");
        assert_eq!(region, RegionId::new(1));
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        let mut form = valid_form();
        form.customer_name = "  ".to_string();
        assert!(form.validate().is_err());

        let mut form = valid_form();
        form.customer_address = String::new();
        assert!(form.validate().is_err());

        let mut form = valid_form();
        form.region = String::new();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_phone() {
        let mut form = valid_form();
        form.customer_phone = "02012345678".to_string();
        let err = form.validate().unwrap_err();
        assert!(err.contains("phone"));

        form.customer_phone = "0101234567".to_string();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_alternate_carrier() {
        let mut form = valid_form();
        form.customer_phone = "01512345678".to_string();
        assert!(form.validate().is_ok());
    }
}
