//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::shop_api::Product;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image: String,
    pub bestseller: bool,
    pub in_stock: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.price.to_string(),
            image: product.image.clone(),
            bestseller: product.bestseller,
            in_stock: product.in_stock(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Bestseller strip.
    pub bestsellers: Vec<ProductCardView>,
    /// True when the bestseller fetch failed and the strip is empty.
    pub degraded: bool,
}

/// Display the home page.
///
/// A failed bestseller fetch degrades to an empty strip with an inline
/// notice; the page itself always renders.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let (bestsellers, degraded) = match state.shop_api().bestsellers().await {
        Ok(products) => (
            products.iter().map(ProductCardView::from).collect(),
            false,
        ),
        Err(e) => {
            tracing::warn!("failed to fetch bestsellers: {e}");
            (Vec::new(), true)
        }
    };

    HomeTemplate {
        bestsellers,
        degraded,
    }
}
