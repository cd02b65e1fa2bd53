//! Integration tests for the admin comanda and cashier flows.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The admin server running (cargo run -p solara-admin)
//! - A seeded catalog (solara seed)
//! - An admin user matching `ADMIN_TEST_EMAIL` / `ADMIN_TEST_PASSWORD`
//!
//! Run with: cargo test -p solara-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use solara_integration_tests::{admin_base_url, cookie_client, test_email};

/// Log in as the test admin and return the session-holding client.
async fn authenticated_client() -> Client {
    let client = cookie_client();
    let base_url = admin_base_url();

    let email =
        std::env::var("ADMIN_TEST_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
    let password =
        std::env::var("ADMIN_TEST_PASSWORD").unwrap_or_else(|_| "admin-password".to_string());

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in as test admin");
    assert_eq!(resp.status(), StatusCode::OK, "admin login must succeed");

    client
}

/// Create a walk-in client and return its ID.
async fn create_test_client(client: &Client) -> i64 {
    let base_url = admin_base_url();
    let resp = client
        .post(format!("{base_url}/clients"))
        .json(&json!({
            "email": test_email("walkin"),
            "name": "Walk-in Test",
            "phone": "+55 11 98888-0000"
        }))
        .send()
        .await
        .expect("Failed to create test client");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse client");
    body["id"].as_i64().expect("client id")
}

#[tokio::test]
#[ignore = "Requires running admin server, seeded database, and a test admin"]
async fn test_admin_routes_require_auth() {
    let client = cookie_client();
    let base_url = admin_base_url();

    let resp = client
        .get(format!("{base_url}/comandas"))
        .send()
        .await
        .expect("Failed to reach comandas");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server, seeded database, and a test admin"]
async fn test_comanda_lifecycle_totals() {
    let client = authenticated_client().await;
    let base_url = admin_base_url();
    let client_id = create_test_client(&client).await;

    // Open
    let resp = client
        .post(format!("{base_url}/comandas"))
        .json(&json!({ "client_id": client_id }))
        .send()
        .await
        .expect("Failed to open comanda");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let comanda: Value = resp.json().await.expect("Failed to parse comanda");
    let comanda_id = comanda["id"].as_i64().expect("comanda id");
    assert_eq!(comanda["status"], "open");
    assert_eq!(comanda["total"], "0");

    // A second open for the same client conflicts
    let resp = client
        .post(format!("{base_url}/comandas"))
        .json(&json!({ "client_id": client_id }))
        .send()
        .await
        .expect("Failed to re-open comanda");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Add a service line
    let resp = client
        .post(format!("{base_url}/comandas/{comanda_id}/items"))
        .json(&json!({ "kind": "service", "service_id": 1, "professional_id": 1 }))
        .send()
        .await
        .expect("Failed to add service item");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Add a product line
    let resp = client
        .post(format!("{base_url}/comandas/{comanda_id}/items"))
        .json(&json!({ "kind": "product", "product_id": 1, "quantity": 2 }))
        .send()
        .await
        .expect("Failed to add product item");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Totals are derived from the items
    let resp = client
        .get(format!("{base_url}/comandas/{comanda_id}"))
        .send()
        .await
        .expect("Failed to fetch comanda");
    let detailed: Value = resp.json().await.expect("Failed to parse comanda");
    let items = detailed["items"].as_array().expect("items array");
    assert_eq!(items.len(), 2);
    assert!(detailed["subtotal"].is_string());

    // Close with a payment method
    let resp = client
        .post(format!("{base_url}/comandas/{comanda_id}/close"))
        .json(&json!({ "payment_method": "pix" }))
        .send()
        .await
        .expect("Failed to close comanda");
    assert_eq!(resp.status(), StatusCode::OK);
    let closed: Value = resp.json().await.expect("Failed to parse comanda");
    assert_eq!(closed["status"], "closed");
    assert_eq!(closed["payment_method"], "pix");

    // Items are frozen after close
    let resp = client
        .post(format!("{base_url}/comandas/{comanda_id}/items"))
        .json(&json!({ "kind": "product", "product_id": 1, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to post to closed comanda");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore = "Requires running admin server, seeded database, and a test admin"]
async fn test_cashier_shift_arithmetic() {
    let client = authenticated_client().await;
    let base_url = admin_base_url();

    // Open a shift with 100.00 in the drawer
    let resp = client
        .post(format!("{base_url}/cashier/open"))
        .json(&json!({ "opening_amount": "100.00" }))
        .send()
        .await
        .expect("Failed to open register");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // A second open conflicts
    let resp = client
        .post(format!("{base_url}/cashier/open"))
        .json(&json!({ "opening_amount": "1.00" }))
        .send()
        .await
        .expect("Failed to re-open register");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Record a withdrawal
    let resp = client
        .post(format!("{base_url}/cashier/movements"))
        .json(&json!({
            "kind": "withdrawal",
            "amount": "30.00",
            "description": "sangria"
        }))
        .send()
        .await
        .expect("Failed to record movement");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Current shows the running expectation
    let resp = client
        .get(format!("{base_url}/cashier/current"))
        .send()
        .await
        .expect("Failed to fetch current register");
    assert_eq!(resp.status(), StatusCode::OK);
    let current: Value = resp.json().await.expect("Failed to parse register");
    assert_eq!(current["withdrawals"], "30.00");

    // Close with the counted amount; the difference is reported
    let resp = client
        .post(format!("{base_url}/cashier/close"))
        .json(&json!({ "closing_amount": "70.00" }))
        .send()
        .await
        .expect("Failed to close register");
    assert_eq!(resp.status(), StatusCode::OK);
    let summary: Value = resp.json().await.expect("Failed to parse summary");
    assert_eq!(summary["status"], "closed");
    assert!(summary["expected_amount"].is_string());
    assert!(summary["difference"].is_string());
}
