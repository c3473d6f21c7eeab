//! Amara Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod shipping;
pub mod shop_api;
pub mod state;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the shop service.
async fn health() -> &'static str {
    "ok"
}

/// Build the application router with sessions and request tracing.
///
/// The binary adds static file serving and Sentry layers on top; tests
/// drive this router directly.
#[must_use]
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub use state::AppState;
