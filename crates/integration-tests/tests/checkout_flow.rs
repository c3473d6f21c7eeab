//! Integration tests for the checkout flow: the empty-cart gate, shipping
//! resolution with its fallback table, and order submission semantics
//! (cart cleared exactly once on success, untouched on failure).

#![allow(clippy::unwrap_used, clippy::expect_used)]

use amara_core::types::Price;
use amara_integration_tests::{TestApp, order_receipt_json, regions_json, sized_product_json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

async fn mock_catalog_and_product(app: &TestApp) {
    Mock::given(method("GET"))
        .and(path("/api/products/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sized_product_json(
            "p1",
            "Linen Dress",
            550.0,
            &[("M", 10)],
        )))
        .mount(&app.mock)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/shipping/governorates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(regions_json()))
        .mount(&app.mock)
        .await;
}

async fn fill_cart(app: &TestApp) {
    let response = app
        .client
        .post(app.url("/cart/add"))
        .form(&[("product_id", "p1"), ("size", "M"), ("quantity", "2")])
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

fn valid_order_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("customer_name", "Mona Hassan"),
        ("customer_phone", "01012345678"),
        ("customer_address", "12 Tahrir St, Downtown"),
        ("region", "1"),
        ("notes", ""),
    ]
}

#[tokio::test]
async fn checkout_with_empty_cart_redirects_home() {
    let app = TestApp::spawn().await;

    let response = app.client.get(app.url("/checkout")).send().await.unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(
        response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok()),
        Some("/")
    );
}

#[tokio::test]
async fn submit_with_empty_cart_redirects_home() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/checkout"))
        .form(&valid_order_form())
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
}

#[tokio::test]
async fn checkout_page_lists_regions_with_fees() {
    let app = TestApp::spawn().await;
    mock_catalog_and_product(&app).await;
    fill_cart(&app).await;

    let body = app
        .client
        .get(app.url("/checkout"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("Cairo"));
    assert!(body.contains("EGP 30.00"));
    // Live catalog loaded; no degraded-rates notice
    assert!(!body.contains("standard rates"));
}

#[tokio::test]
async fn checkout_page_degrades_to_fallback_regions() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/api/products/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sized_product_json(
            "p1",
            "Linen Dress",
            550.0,
            &[("M", 10)],
        )))
        .mount(&app.mock)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/shipping/governorates"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.mock)
        .await;
    fill_cart(&app).await;

    let body = app
        .client
        .get(app.url("/checkout"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    // Form stays usable with all 27 fallback regions and a warning
    assert!(body.contains("standard rates"));
    assert!(body.contains("Cairo"));
    assert!(body.contains("Sohag"));
}

#[tokio::test]
async fn shipping_quote_resolves_cairo_to_thirty_pounds() {
    let app = TestApp::spawn().await;
    mock_catalog_and_product(&app).await;
    Mock::given(method("GET"))
        .and(path("/api/shipping/shipping-cost/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"shippingCost": 30, "governorateName": "Cairo"})),
        )
        .mount(&app.mock)
        .await;
    fill_cart(&app).await;

    let body = app
        .client
        .post(app.url("/checkout/shipping"))
        .form(&[("region", "1")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("EGP 30.00"), "body: {body}");
    // Subtotal 1100 + shipping 30, formatted exactly as Price renders it
    let expected_total = Price::from_pounds(1130).to_string();
    assert!(body.contains(&expected_total), "body: {body}");
}

#[tokio::test]
async fn shipping_quote_falls_back_when_endpoint_is_down() {
    let app = TestApp::spawn().await;
    mock_catalog_and_product(&app).await;
    Mock::given(method("GET"))
        .and(path("/api/shipping/shipping-cost/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.mock)
        .await;
    fill_cart(&app).await;

    let body = app
        .client
        .post(app.url("/checkout/shipping"))
        .form(&[("region", "1")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    // Same fee whether resolved remotely or from the fallback table
    assert!(body.contains("EGP 30.00"), "body: {body}");
}

#[tokio::test]
async fn successful_order_clears_cart_and_shows_confirmation_once() {
    let app = TestApp::spawn().await;
    mock_catalog_and_product(&app).await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(201).set_body_json(order_receipt_json(
            "ord-77",
            1130.0,
            30.0,
            "Mona Hassan",
        )))
        .expect(1)
        .mount(&app.mock)
        .await;
    fill_cart(&app).await;

    let response = app
        .client
        .post(app.url("/checkout"))
        .form(&valid_order_form())
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(
        response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok()),
        Some("/checkout/success")
    );

    // Cart cleared exactly once, synchronously with the commit
    assert_eq!(app.cart_count().await, 0);

    let confirmation = app
        .client
        .get(app.url("/checkout/success"))
        .send()
        .await
        .unwrap();
    assert!(confirmation.status().is_success());
    let body = confirmation.text().await.unwrap();
    assert!(body.contains("ord-77"));
    assert!(body.contains("EGP 1130.00"));
    assert!(body.contains("Cairo"));

    // The confirmation is one-shot; a refresh goes home
    let again = app
        .client
        .get(app.url("/checkout/success"))
        .send()
        .await
        .unwrap();
    assert!(again.status().is_redirection());
}

#[tokio::test]
async fn failed_order_keeps_cart_and_surfaces_server_message() {
    let app = TestApp::spawn().await;
    mock_catalog_and_product(&app).await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({"message": "Linen Dress is out of stock"})),
        )
        .mount(&app.mock)
        .await;
    fill_cart(&app).await;

    let response = app
        .client
        .post(app.url("/checkout"))
        .form(&valid_order_form())
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    assert!(body.contains("Linen Dress is out of stock"), "body: {body}");

    // Cart NOT cleared; the customer can retry with the same input
    assert_eq!(app.cart_count().await, 2);
    assert!(body.contains("Mona Hassan"));
    assert!(body.contains("01012345678"));
}

#[tokio::test]
async fn validation_rejects_bad_phone_before_any_network_call() {
    let app = TestApp::spawn().await;
    mock_catalog_and_product(&app).await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.mock)
        .await;
    fill_cart(&app).await;

    let mut form = valid_order_form();
    form[1] = ("customer_phone", "02012345678");

    let response = app
        .client
        .post(app.url("/checkout"))
        .form(&form)
        .send()
        .await
        .unwrap();

    let body = response.text().await.unwrap();
    assert!(body.contains("valid phone number"), "body: {body}");
    assert_eq!(app.cart_count().await, 2);
}
