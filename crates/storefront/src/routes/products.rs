//! Product route handlers.

use amara_core::types::ProductId;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
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

/// Size option display data for the detail page picker.
#[derive(Clone)]
pub struct SizeOptionView {
    pub label: String,
    pub quantity: u32,
}

/// Product detail display data.
#[derive(Clone)]
pub struct ProductDetailView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: String,
    pub bestseller: bool,
    pub has_sizes: bool,
    pub total_stock: u32,
}

/// Listing filter, parsed from the `filter` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingFilter {
    #[default]
    All,
    Bestsellers,
    Available,
}

impl ListingFilter {
    fn keeps(self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Bestsellers => product.bestseller,
            Self::Available => product.in_stock(),
        }
    }

    /// Query value for template links.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Bestsellers => "bestsellers",
            Self::Available => "available",
        }
    }
}

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    #[serde(default)]
    pub filter: ListingFilter,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductCardView>,
    pub filter: ListingFilter,
    pub degraded: bool,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductDetailView,
    /// Sizes with remaining stock, in catalog order.
    pub sizes: Vec<SizeOptionView>,
}

/// Display product listing page.
///
/// The filter runs server-side over the full catalog; a failed fetch
/// degrades to an empty grid with an inline notice.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> impl IntoResponse {
    let (products, degraded) = match state.shop_api().list_products().await {
        Ok(products) => (products, false),
        Err(e) => {
            tracing::warn!("failed to fetch products: {e}");
            (Vec::new(), true)
        }
    };

    let products = products
        .iter()
        .filter(|product| query.filter.keeps(product))
        .map(ProductCardView::from)
        .collect();

    ProductsIndexTemplate {
        products,
        filter: query.filter,
        degraded,
    }
}

/// Display product detail page.
///
/// # Errors
///
/// Returns 404 for an unknown product ID.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let product_id = ProductId::new(id);
    let product = state.shop_api().get_product(&product_id).await?;

    let sizes = product
        .available_sizes()
        .into_iter()
        .map(|size| SizeOptionView {
            label: size.label.clone(),
            quantity: size.quantity,
        })
        .collect();

    Ok(ProductShowTemplate {
        product: ProductDetailView {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            image: product.image.clone(),
            bestseller: product.bestseller,
            has_sizes: product.has_sizes(),
            total_stock: product.total_stock(),
        },
        sizes,
    })
}
