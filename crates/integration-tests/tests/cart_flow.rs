//! Integration tests for the session cart.
//!
//! These tests require:
//! - A running `PostgreSQL` database (for direct product seeding)
//! - The storefront server running (cargo run -p voltshop-storefront)

use reqwest::StatusCode;

use voltshop_integration_tests::{base_url, client, pool, register_and_login, seed_product};

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_add_to_cart_and_view() {
    let pool = pool().await;
    let name = seed_product(&pool, "Cart Widget", "19.99", 10).await;

    let client = client();
    register_and_login(&client, "cart").await;

    let resp = client
        .get(format!("{}/add-to-cart/{name}/19.99", base_url()))
        .send()
        .await
        .expect("add-to-cart request failed");
    assert!(resp.status().is_redirection());
    assert_eq!(
        resp.headers()
            .get("location")
            .and_then(|v| v.to_str().ok()),
        Some("/cart")
    );

    let resp = client
        .get(format!("{}/cart", base_url()))
        .send()
        .await
        .expect("cart request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = resp.json().await.expect("cart body not JSON");
    assert_eq!(body["unit_count"], serde_json::json!(1));
    assert_eq!(body["items"][0]["product_name"], serde_json::json!(name));
    assert_eq!(body["items"][0]["quantity"], serde_json::json!(1));
    assert_eq!(body["total"], serde_json::json!("19.99"));
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_add_same_product_twice_merges() {
    let pool = pool().await;
    let name = seed_product(&pool, "Merge Widget", "5.00", 10).await;

    let client = client();
    register_and_login(&client, "merge").await;

    for _ in 0..2 {
        let resp = client
            .get(format!("{}/add-to-cart/{name}/5.00", base_url()))
            .send()
            .await
            .expect("add-to-cart request failed");
        assert!(resp.status().is_redirection());
    }

    let resp = client
        .get(format!("{}/cart", base_url()))
        .send()
        .await
        .expect("cart request failed");
    let body: serde_json::Value = resp.json().await.expect("cart body not JSON");

    // One line, two units
    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["items"][0]["quantity"], serde_json::json!(2));
    assert_eq!(body["total"], serde_json::json!("10.00"));
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_add_to_cart_rejects_tampered_price() {
    let pool = pool().await;
    let name = seed_product(&pool, "Tamper Widget", "49.99", 10).await;

    let client = client();
    register_and_login(&client, "tamper").await;

    // The URL claims a cheaper price than the catalog holds
    let resp = client
        .get(format!("{}/add-to-cart/{name}/0.01", base_url()))
        .send()
        .await
        .expect("add-to-cart request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Nothing landed in the cart
    let resp = client
        .get(format!("{}/cart", base_url()))
        .send()
        .await
        .expect("cart request failed");
    let body: serde_json::Value = resp.json().await.expect("cart body not JSON");
    assert_eq!(body["unit_count"], serde_json::json!(0));
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_add_to_cart_unknown_product() {
    let client = client();
    register_and_login(&client, "ghost").await;

    let resp = client
        .get(format!(
            "{}/add-to-cart/no-such-product-ever/1.00",
            base_url()
        ))
        .send()
        .await
        .expect("add-to-cart request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_carts_are_per_session() {
    let pool = pool().await;
    let name = seed_product(&pool, "Private Widget", "9.99", 10).await;

    let alice = client();
    register_and_login(&alice, "alice").await;
    let resp = alice
        .get(format!("{}/add-to-cart/{name}/9.99", base_url()))
        .send()
        .await
        .expect("add-to-cart request failed");
    assert!(resp.status().is_redirection());

    // A different session sees an empty cart
    let bob = client();
    register_and_login(&bob, "bob").await;
    let resp = bob
        .get(format!("{}/cart", base_url()))
        .send()
        .await
        .expect("cart request failed");
    let body: serde_json::Value = resp.json().await.expect("cart body not JSON");
    assert_eq!(body["unit_count"], serde_json::json!(0));
}
