//! End-to-end tests for the client-manager API.
//!
//! The tests in `tests/` talk to a running server over HTTP and are ignored
//! by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Apply migrations and start the server with a bootstrap admin
//! cargo run -p client-manager-cli -- migrate
//! ADMIN_NAME=Administrator ADMIN_EMAIL=admin@example.com ADMIN_PASSWORD=change-me-now \
//!     cargo run -p client-manager-api
//!
//! # Run the ignored tests against it
//! cargo test -p client-manager-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `CLIENT_MANAGER_BASE_URL` - Server URL (default: `http://localhost:3080`)
//! - `ADMIN_EMAIL`, `ADMIN_PASSWORD` - Credentials of the bootstrap admin

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("CLIENT_MANAGER_BASE_URL").unwrap_or_else(|_| "http://localhost:3080".to_string())
}

/// Full URL of an `/api/v1` endpoint.
#[must_use]
pub fn api_url(path: &str) -> String {
    format!("{}/api/v1{path}", base_url())
}

/// A client that keeps the session cookie between requests.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Log `client` in, returning the response status.
pub async fn login(client: &Client, email: &str, password: &str) -> StatusCode {
    client
        .post(api_url("/users/login"))
        .json(&json!({"email": email, "password": password}))
        .send()
        .await
        .expect("Failed to send login request")
        .status()
}

/// A client logged in as the bootstrap admin.
pub async fn admin_client() -> Client {
    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "change-me-now".to_string());

    let client = client();
    assert_eq!(login(&client, &email, &password).await, StatusCode::OK);
    client
}

/// `n` decimal digits derived from a fresh UUID, so repeated runs do not
/// collide on unique columns.
#[must_use]
pub fn unique_digits(n: usize) -> String {
    let digits = Uuid::new_v4().as_u128().to_string();
    digits.chars().rev().take(n).collect()
}

/// A valid PF customer payload with unique email, phone and CPF.
#[must_use]
pub fn pf_customer_payload() -> Value {
    let tag = unique_digits(8);
    json!({
        "name": "Maria da Silva",
        "email": format!("maria.{tag}@example.com"),
        "phone": format!("119{}", unique_digits(8)),
        "cpf": unique_digits(11),
        "birth_date": "17-05-1990",
        "address_type": "home",
        "street": "Avenida Paulista",
        "number": "1000",
        "state": "SP",
        "city": "São Paulo",
        "cep": "01310-100"
    })
}

/// Create a PF customer and return its id.
pub async fn create_pf_customer(client: &Client) -> String {
    let resp = client
        .post(api_url("/customers/pf"))
        .json(&pf_customer_payload())
        .send()
        .await
        .expect("Failed to create customer");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to read response");
    body["customer_id"]
        .as_str()
        .expect("customer_id missing")
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_digits_has_requested_length() {
        let digits = unique_digits(11);
        assert_eq!(digits.len(), 11);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn api_url_has_version_prefix() {
        assert!(api_url("/customers").ends_with("/api/v1/customers"));
    }
}
