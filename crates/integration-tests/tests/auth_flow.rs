//! Integration tests for registration, login, and logout.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - The storefront server running (cargo run -p voltshop-storefront)

use reqwest::StatusCode;

use voltshop_integration_tests::{
    TEST_PASSWORD, base_url, client, login, register, register_and_login, unique_email,
};

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_register_login_logout_roundtrip() {
    let client = client();
    let email = unique_email("auth");

    // Register redirects to the login page
    let resp = register(&client, &email, TEST_PASSWORD).await;
    assert!(resp.status().is_redirection());
    assert_eq!(
        resp.headers()
            .get("location")
            .and_then(|v| v.to_str().ok()),
        Some("/login")
    );

    // Login redirects home and sets the session cookie
    let resp = login(&client, &email, TEST_PASSWORD).await;
    assert!(resp.status().is_redirection());
    assert_eq!(
        resp.headers()
            .get("location")
            .and_then(|v| v.to_str().ok()),
        Some("/")
    );

    // Authenticated: the cart is reachable
    let resp = client
        .get(format!("{}/cart", base_url()))
        .send()
        .await
        .expect("cart request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    // Logout drops the login
    let resp = client
        .get(format!("{}/logout", base_url()))
        .send()
        .await
        .expect("logout request failed");
    assert!(resp.status().is_redirection());

    // Back to being redirected to login
    let resp = client
        .get(format!("{}/cart", base_url()))
        .send()
        .await
        .expect("cart request failed");
    assert_eq!(
        resp.headers()
            .get("location")
            .and_then(|v| v.to_str().ok()),
        Some("/login")
    );
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_register_rejects_weak_password() {
    let client = client();

    let resp = register(&client, &unique_email("weak"), "short").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Missing symbol
    let resp = register(&client, &unique_email("weak"), "Password123").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_register_duplicate_email_conflicts() {
    let client = client();
    let email = unique_email("dup");

    let resp = register(&client, &email, TEST_PASSWORD).await;
    assert!(resp.status().is_redirection());

    let resp = register(&client, &email, TEST_PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Same address in different case collides too (emails are normalized)
    let resp = register(&client, &email.to_uppercase(), TEST_PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_login_wrong_password_unauthorized() {
    let client = client();
    let email = unique_email("badpw");

    let resp = register(&client, &email, TEST_PASSWORD).await;
    assert!(resp.status().is_redirection());

    let resp = login(&client, &email, "Wrong-Pass-999!").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Unknown account reads the same as a wrong password
    let resp = login(&client, &unique_email("ghost"), TEST_PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_protected_routes_redirect_anonymous_to_login() {
    let client = client();

    for path in ["/cart", "/orders", "/cancel"] {
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
async fn test_home_shows_logged_in_user() {
    let client = client();
    let email = register_and_login(&client, "home").await;

    let resp = client
        .get(format!("{}/", base_url()))
        .send()
        .await
        .expect("home request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = resp.json().await.expect("home body not JSON");
    assert_eq!(body["user"], serde_json::json!(email));
    assert!(body["products"].is_array());
}
