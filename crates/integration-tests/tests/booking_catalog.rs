//! Integration tests for the public catalog endpoints.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The booking server running (cargo run -p solara-booking)
//! - A seeded catalog (solara seed)
//!
//! Run with: cargo test -p solara-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::Value;

use solara_core::ServiceCategory;
use solara_integration_tests::{booking_base_url, cookie_client};

#[tokio::test]
#[ignore = "Requires running booking server and seeded database"]
async fn test_health_endpoints() {
    let client = cookie_client();
    let base_url = booking_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to reach health endpoint");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to reach readiness endpoint");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running booking server and seeded database"]
async fn test_service_listing_shape() {
    let client = cookie_client();
    let base_url = booking_base_url();

    let resp = client
        .get(format!("{base_url}/api/services"))
        .send()
        .await
        .expect("Failed to list services");
    assert_eq!(resp.status(), StatusCode::OK);

    let services: Value = resp.json().await.expect("Failed to parse response");
    let services = services.as_array().expect("services is an array");
    assert!(!services.is_empty(), "seeded catalog should not be empty");

    let first = &services[0];
    assert!(first["id"].is_number());
    assert!(first["name"].is_string());
    // Categories on the wire always parse into the shared enum
    first["category"]
        .as_str()
        .expect("category is a string")
        .parse::<ServiceCategory>()
        .expect("category is a known value");
    assert!(first["price"]["amount"].is_string());
    assert!(first["duration_minutes"].is_number());
    // The public surface never exposes inactive services
    assert_eq!(first["active"], true);
}

#[tokio::test]
#[ignore = "Requires running booking server and seeded database"]
async fn test_service_category_filter() {
    let client = cookie_client();
    let base_url = booking_base_url();

    let resp = client
        .get(format!("{base_url}/api/services?category=nails"))
        .send()
        .await
        .expect("Failed to list filtered services");
    assert_eq!(resp.status(), StatusCode::OK);

    let services: Value = resp.json().await.expect("Failed to parse response");
    for service in services.as_array().expect("services is an array") {
        assert_eq!(service["category"], "nails");
    }
}

#[tokio::test]
#[ignore = "Requires running booking server and seeded database"]
async fn test_availability_requires_known_service() {
    let client = cookie_client();
    let base_url = booking_base_url();

    let resp = client
        .get(format!(
            "{base_url}/api/availability?professional_id=1&service_id=999999&date=2027-03-02"
        ))
        .send()
        .await
        .expect("Failed to query availability");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = resp.json().await.expect("Failed to parse response");
    assert!(body["error"].is_string());
}

#[tokio::test]
#[ignore = "Requires running booking server and seeded database"]
async fn test_availability_slot_shape() {
    let client = cookie_client();
    let base_url = booking_base_url();

    // A Tuesday well in the future; the seeded professional works Tue-Sat.
    let resp = client
        .get(format!(
            "{base_url}/api/availability?professional_id=1&service_id=1&date=2027-03-02"
        ))
        .send()
        .await
        .expect("Failed to query availability");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["date"], "2027-03-02");
    let slots = body["slots"].as_array().expect("slots is an array");
    for slot in slots {
        assert!(slot["starts_at"].is_string());
        assert!(slot["ends_at"].is_string());
    }
}
