//! Shared helpers for Solara integration tests.
//!
//! The tests in `tests/` drive the running binaries over HTTP and are
//! `#[ignore]`d by default; run them with a database, both servers, and
//! `cargo test -p solara-integration-tests -- --ignored`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;

/// Base URL for the booking API (configurable via environment).
#[must_use]
pub fn booking_base_url() -> String {
    std::env::var("BOOKING_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin API (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Create an HTTP client with a cookie store, so session cookies from
/// login responses are replayed on subsequent requests.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn cookie_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique-enough email for test accounts, derived from the current time.
#[must_use]
pub fn test_email(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("{prefix}+{nanos}@example.com")
}
