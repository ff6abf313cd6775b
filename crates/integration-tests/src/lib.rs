//! Integration tests for Brisa.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p brisa-cli -- migrate
//!
//! # Start the server
//! cargo run -p brisa-server
//!
//! # Run integration tests
//! cargo test -p brisa-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `BRISA_BASE_URL` - Server base URL (default `http://localhost:8080`)
//! - `BRISA_TEST_PASSWORD` - Operator password matching the server's hash

use reqwest::{Client, StatusCode};

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("BRISA_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// Operator password for the test server.
#[must_use]
pub fn test_password() -> String {
    std::env::var("BRISA_TEST_PASSWORD").unwrap_or_else(|_| "test-password".to_string())
}

/// Cookie-holding client with no session yet.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn anonymous_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Log in and return a client carrying the session cookie.
///
/// # Panics
///
/// Panics if the login request fails or is rejected.
pub async fn authenticated_client() -> Client {
    let client = anonymous_client();
    let resp = client
        .post(format!("{}/login", base_url()))
        .json(&serde_json::json!({ "password": test_password() }))
        .send()
        .await
        .expect("Failed to send login request");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT, "login rejected");
    client
}
