//! Integration tests for registration, login and logout.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (client-manager migrate)
//! - The API server running with a bootstrap admin
//!
//! Run with: cargo test -p client-manager-integration-tests -- --ignored

#![allow(clippy::expect_used)]

use client_manager_integration_tests::{admin_client, api_url, client, login, unique_digits};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_health() {
    let resp = client()
        .get(format!("{}/health", client_manager_integration_tests::base_url()))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_register_login_logout() {
    let admin = admin_client().await;
    let email = format!("clerk.{}@example.com", unique_digits(8));

    let resp = admin
        .post(api_url("/users/register"))
        .json(&json!({
            "name": "Clerk Account",
            "email": email,
            "password": "s3cret-pass",
            "role": false
        }))
        .send()
        .await
        .expect("Failed to register user");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let clerk = client();
    assert_eq!(
        login(&clerk, &email, "s3cret-pass").await,
        StatusCode::OK
    );

    // Logged in, but not an admin
    let resp = clerk
        .get(api_url("/customers"))
        .send()
        .await
        .expect("Failed to list customers");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("Failed to read response");
    assert_eq!(body["error"], "only admins can access this resource");

    let resp = clerk
        .post(api_url("/users/logout"))
        .send()
        .await
        .expect("Failed to log out");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = clerk
        .post(api_url("/users/logout"))
        .send()
        .await
        .expect("Failed to log out");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_bad_credentials() {
    let anonymous = client();
    assert_eq!(
        login(&anonymous, "nobody@example.com", "whatever-pass").await,
        StatusCode::UNAUTHORIZED
    );

    let resp = anonymous
        .post(api_url("/users/logout"))
        .send()
        .await
        .expect("Failed to call logout");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
