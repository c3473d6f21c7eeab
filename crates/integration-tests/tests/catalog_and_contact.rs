//! Integration tests for the read-only pages (home, listing, detail) and
//! the contact form round-trip.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use amara_integration_tests::{TestApp, simple_product_json, sized_product_json};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn home_renders_bestsellers() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/api/products/bestsellers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            sized_product_json("p1", "Linen Dress", 550.0, &[("M", 3)]),
        ])))
        .mount(&app.mock)
        .await;

    let body = app
        .client
        .get(app.url("/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("Linen Dress"));
    assert!(body.contains("EGP 550.00"));
}

#[tokio::test]
async fn home_degrades_when_bestsellers_fail() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/api/products/bestsellers"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.mock)
        .await;

    let response = app.client.get(app.url("/")).send().await.unwrap();

    // The view never crashes; it renders with an inline notice
    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    assert!(body.contains("taking a moment to load"));
}

#[tokio::test]
async fn listing_filters_bestsellers_server_side() {
    let app = TestApp::spawn().await;
    let mut flagged = simple_product_json("p1", "Silk Scarf", 220.0, 5);
    flagged["bestseller"] = json!(true);
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            flagged,
            simple_product_json("p2", "Cotton Tote", 180.0, 5),
        ])))
        .mount(&app.mock)
        .await;

    let body = app
        .client
        .get(app.url("/products?filter=bestsellers"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("Silk Scarf"));
    assert!(!body.contains("Cotton Tote"));
}

#[tokio::test]
async fn listing_filters_out_sold_out_products() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            simple_product_json("p1", "Silk Scarf", 220.0, 5),
            simple_product_json("p2", "Cotton Tote", 180.0, 0),
        ])))
        .mount(&app.mock)
        .await;

    let body = app
        .client
        .get(app.url("/products?filter=available"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("Silk Scarf"));
    assert!(!body.contains("Cotton Tote"));
}

#[tokio::test]
async fn unknown_product_is_a_404() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/api/products/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&app.mock)
        .await;

    let response = app
        .client
        .get(app.url("/products/ghost"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn detail_page_offers_only_sizes_with_stock() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/api/products/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sized_product_json(
            "p1",
            "Linen Dress",
            550.0,
            &[("M", 3), ("L", 0)],
        )))
        .mount(&app.mock)
        .await;

    let body = app
        .client
        .get(app.url("/products/p1"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("value=\"M\""));
    assert!(!body.contains("value=\"L\""));
}

#[tokio::test]
async fn contact_form_round_trip() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/api/contact"))
        .and(body_partial_json(json!({"email": "mona@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&app.mock)
        .await;

    let body = app
        .client
        .post(app.url("/contact"))
        .form(&[
            ("name", "Mona"),
            ("email", "mona@example.com"),
            ("subject", "Sizing"),
            ("message", "Does the linen dress run large?"),
        ])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("has been sent"));
}

#[tokio::test]
async fn contact_rejects_invalid_email_without_network_call() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/api/contact"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.mock)
        .await;

    let body = app
        .client
        .post(app.url("/contact"))
        .form(&[
            ("name", "Mona"),
            ("email", "a@b"),
            ("subject", "Sizing"),
            ("message", "Hello"),
        ])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("valid email address"));
}

#[tokio::test]
async fn contact_surfaces_service_rejection_and_keeps_input() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/api/contact"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "message": "Subject too long"})),
        )
        .mount(&app.mock)
        .await;

    let body = app
        .client
        .post(app.url("/contact"))
        .form(&[
            ("name", "Mona"),
            ("email", "mona@example.com"),
            ("subject", "Sizing"),
            ("message", "Hello there"),
        ])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("Subject too long"));
    // Form values retained for retry
    assert!(body.contains("mona@example.com"));
}
