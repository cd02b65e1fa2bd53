//! Integration tests for client accounts and appointment booking.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The booking server running (cargo run -p solara-booking)
//! - A seeded catalog (solara seed)
//!
//! Run with: cargo test -p solara-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use solara_integration_tests::{booking_base_url, cookie_client, test_email};

#[tokio::test]
#[ignore = "Requires running booking server and seeded database"]
async fn test_register_login_me_roundtrip() {
    let client = cookie_client();
    let base_url = booking_base_url();
    let email = test_email("ana");

    // Register establishes a session
    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({
            "email": email,
            "password": "uma senha boa",
            "name": "Ana Test",
            "phone": "+55 11 99999-0000"
        }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["email"], email.as_str());
    assert_eq!(body["profile_completed"], true);
    assert!(
        body.get("password_hash").is_none(),
        "hashes must never be serialized"
    );

    // The session cookie works for /me
    let resp = client
        .get(format!("{base_url}/api/auth/me"))
        .send()
        .await
        .expect("Failed to fetch /me");
    assert_eq!(resp.status(), StatusCode::OK);

    // Duplicate registration conflicts
    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({ "email": email, "password": "uma senha boa" }))
        .send()
        .await
        .expect("Failed to re-register");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running booking server and seeded database"]
async fn test_login_failures_are_uniform() {
    let client = cookie_client();
    let base_url = booking_base_url();

    let unknown = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "email": "nobody@example.com", "password": "whatever!" }))
        .send()
        .await
        .expect("Failed to login");
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);

    let unknown_body: Value = unknown.json().await.expect("Failed to parse response");
    // Same message whether the account exists or not
    assert_eq!(unknown_body["error"], "Unauthorized: invalid email or password");
}

#[tokio::test]
#[ignore = "Requires running booking server and seeded database"]
async fn test_booking_requires_auth() {
    let client = cookie_client();
    let base_url = booking_base_url();

    let resp = client
        .post(format!("{base_url}/api/appointments"))
        .json(&json!({
            "professional_id": 1,
            "service_id": 1,
            "date": "2027-03-02",
            "starts_at": "10:00:00"
        }))
        .send()
        .await
        .expect("Failed to post appointment");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running booking server and seeded database"]
async fn test_book_and_cancel_appointment() {
    let client = cookie_client();
    let base_url = booking_base_url();
    let email = test_email("booker");

    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({ "email": email, "password": "uma senha boa" }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Pick the first open slot on a future working day
    let availability: Value = client
        .get(format!(
            "{base_url}/api/availability?professional_id=1&service_id=1&date=2027-03-02"
        ))
        .send()
        .await
        .expect("Failed to query availability")
        .json()
        .await
        .expect("Failed to parse availability");
    let slot = &availability["slots"][0];
    let starts_at = slot["starts_at"].as_str().expect("slot start");

    let resp = client
        .post(format!("{base_url}/api/appointments"))
        .json(&json!({
            "professional_id": 1,
            "service_id": 1,
            "date": "2027-03-02",
            "starts_at": starts_at
        }))
        .send()
        .await
        .expect("Failed to book");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let appointment: Value = resp.json().await.expect("Failed to parse appointment");
    assert_eq!(appointment["status"], "scheduled");
    let id = appointment["id"].as_i64().expect("appointment id");

    // The same slot is now taken
    let resp = client
        .post(format!("{base_url}/api/appointments"))
        .json(&json!({
            "professional_id": 1,
            "service_id": 1,
            "date": "2027-03-02",
            "starts_at": starts_at
        }))
        .send()
        .await
        .expect("Failed to re-book");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Cancel frees it again
    let resp = client
        .post(format!("{base_url}/api/appointments/{id}/cancel"))
        .send()
        .await
        .expect("Failed to cancel");
    assert_eq!(resp.status(), StatusCode::OK);

    let canceled: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(canceled["status"], "canceled");

    // A second cancel conflicts
    let resp = client
        .post(format!("{base_url}/api/appointments/{id}/cancel"))
        .send()
        .await
        .expect("Failed to re-cancel");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}
