//! Integration tests for the admin panel gate and listings.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - The storefront server running with `VOLTSHOP_ADMIN_EMAIL` /
//!   `VOLTSHOP_ADMIN_PASSWORD` set (the same values must be in this test's
//!   environment)

use reqwest::{Client, StatusCode};

use voltshop_integration_tests::{base_url, client, login, pool, register_and_login, set_user_role};

fn admin_email() -> String {
    std::env::var("VOLTSHOP_ADMIN_EMAIL").unwrap_or_else(|_| "admin@voltshop.test".to_string())
}

fn admin_password() -> String {
    std::env::var("VOLTSHOP_ADMIN_PASSWORD")
        .expect("VOLTSHOP_ADMIN_PASSWORD must be set for admin tests")
}

async fn admin_client() -> Client {
    let client = client();
    let resp = login(&client, &admin_email(), &admin_password()).await;
    assert!(
        resp.status().is_redirection(),
        "admin login failed: {}",
        resp.status()
    );
    client
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_admin_routes_redirect_anonymous_to_login() {
    let client = client();

    for path in ["/admin", "/admin/products", "/admin/orders", "/admin/users"] {
        let resp = client
            .get(format!("{}{path}", base_url()))
            .send()
            .await
            .expect("request failed");
        assert!(resp.status().is_redirection(), "{path} should redirect");
        assert_eq!(
            resp.headers()
                .get("location")
                .and_then(|v| v.to_str().ok()),
            Some("/login"),
            "{path} should redirect to /login"
        );
    }
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_admin_routes_forbidden_for_regular_user() {
    let client = client();
    register_and_login(&client, "mortal").await;

    for path in ["/admin", "/admin/products", "/admin/orders", "/admin/users"] {
        let resp = client
            .get(format!("{}{path}", base_url()))
            .send()
            .await
            .expect("request failed");
        assert_eq!(
            resp.status(),
            StatusCode::FORBIDDEN,
            "{path} should be forbidden"
        );
    }
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_role_change_applies_on_next_request() {
    let pool = pool().await;
    let client = client();
    let email = register_and_login(&client, "promoted").await;

    // Freshly registered accounts are not admins
    let resp = client
        .get(format!("{}/admin", base_url()))
        .send()
        .await
        .expect("admin request failed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Promotion takes effect without a new login: the role is looked up
    // fresh on every request, never cached in the session
    set_user_role(&pool, &email, "admin").await;
    let resp = client
        .get(format!("{}/admin", base_url()))
        .send()
        .await
        .expect("admin request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    // And revocation is just as immediate
    set_user_role(&pool, &email, "user").await;
    let resp = client
        .get(format!("{}/admin", base_url()))
        .send()
        .await
        .expect("admin request failed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running storefront server, database, and admin credentials"]
async fn test_admin_dashboard_counts() {
    let client = admin_client().await;

    let resp = client
        .get(format!("{}/admin", base_url()))
        .send()
        .await
        .expect("dashboard request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = resp.json().await.expect("dashboard body not JSON");
    // The bootstrapped admin itself guarantees at least one user
    assert!(body["users"].as_i64().is_some_and(|n| n >= 1));
    assert!(body["products"].is_number());
    assert!(body["orders"].is_number());
}

#[tokio::test]
#[ignore = "Requires running storefront server, database, and admin credentials"]
async fn test_admin_listings_respond() {
    let client = admin_client().await;

    for path in ["/admin/products", "/admin/orders", "/admin/users"] {
        let resp = client
            .get(format!("{}{path}", base_url()))
            .send()
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::OK, "{path} should respond");

        let body: serde_json::Value = resp.json().await.expect("body not JSON");
        assert!(body.is_array(), "{path} should return a list");
    }
}

#[tokio::test]
#[ignore = "Requires running storefront server, database, and admin credentials"]
async fn test_admin_user_listing_never_exposes_digests() {
    let client = admin_client().await;

    let resp = client
        .get(format!("{}/admin/users", base_url()))
        .send()
        .await
        .expect("users request failed");
    let body = resp.text().await.expect("failed to read body");

    assert!(!body.contains("password"));
    assert!(!body.contains("$argon2"));
}
