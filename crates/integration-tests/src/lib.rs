//! Test harness for storefront integration tests.
//!
//! Spawns the real router on an ephemeral port with the shop API pointed
//! at a `wiremock` server, and drives it with a cookie-holding `reqwest`
//! client so the session cart behaves exactly as a browser would see it.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use amara_storefront::config::{ShopApiConfig, StorefrontConfig};
use amara_storefront::{AppState, app};
use serde_json::{Value, json};
use wiremock::MockServer;

/// A running storefront wired to a mock shop service.
pub struct TestApp {
    /// Base URL of the storefront under test.
    pub address: String,
    /// The mock shop service; register expectations on it per test.
    pub mock: MockServer,
    /// Cookie-holding client. Redirects are NOT followed so tests can
    /// assert on them.
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn a storefront instance against a fresh mock shop service.
    ///
    /// # Panics
    ///
    /// Panics when the server cannot be spawned; tests have nothing
    /// useful to do in that case.
    pub async fn spawn() -> Self {
        let mock = MockServer::start().await;

        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: "http://localhost".to_string(),
            shop_api: ShopApiConfig::new(mock.uri().parse().unwrap(), Duration::from_secs(5)),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let state = AppState::new(config).expect("failed to build app state");
        let router = app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let address = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("server error");
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("failed to build test client");

        Self {
            address,
            mock,
            client,
        }
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.address)
    }

    /// Current cart count as the header badge sees it.
    pub async fn cart_count(&self) -> u32 {
        let body = self
            .client
            .get(self.url("/cart/count"))
            .send()
            .await
            .expect("count request failed")
            .text()
            .await
            .expect("count body unreadable");
        body.trim().parse().expect("count badge was not a number")
    }
}

/// Wire JSON for a product sold in sizes.
#[must_use]
pub fn sized_product_json(id: &str, name: &str, price: f64, sizes: &[(&str, u32)]) -> Value {
    json!({
        "_id": id,
        "name": name,
        "description": "",
        "price": price,
        "image": format!("https://cdn.test/{id}.jpg"),
        "bestseller": false,
        "sizes": sizes
            .iter()
            .map(|(label, quantity)| json!({"size": label, "quantity": quantity}))
            .collect::<Vec<_>>(),
    })
}

/// Wire JSON for a product with a flat stock count.
#[must_use]
pub fn simple_product_json(id: &str, name: &str, price: f64, quantity: u32) -> Value {
    json!({
        "_id": id,
        "name": name,
        "description": "",
        "price": price,
        "image": format!("https://cdn.test/{id}.jpg"),
        "bestseller": false,
        "quantity": quantity,
    })
}

/// Wire JSON for the region catalog endpoint.
#[must_use]
pub fn regions_json() -> Value {
    json!([
        {"id": 1, "name": "Cairo", "shippingCost": 30},
        {"id": 2, "name": "Giza", "shippingCost": 30},
        {"id": 3, "name": "Alexandria", "shippingCost": 40},
    ])
}

/// Wire JSON for a committed order.
#[must_use]
pub fn order_receipt_json(order_id: &str, total: f64, shipping: f64, name: &str) -> Value {
    json!({
        "_id": order_id,
        "totalAmount": total,
        "shippingCost": shipping,
        "customerName": name,
        "orderDate": "2026-08-07T10:15:00Z",
    })
}
