//! Integration tests for customer CRUD and the lifecycle endpoints.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p brisa-server)
//! - `BRISA_TEST_PASSWORD` matching the server's `BRISA_ADMIN_PASSWORD_HASH`
//!
//! Run with: cargo test -p brisa-integration-tests -- --ignored

use chrono::{Days, Local};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

use brisa_integration_tests::{authenticated_client, base_url};

/// Test helper: create a customer and return its JSON representation.
async fn create_customer(client: &Client, body: Value) -> Value {
    let resp = client
        .post(format!("{}/customers", base_url()))
        .json(&body)
        .send()
        .await
        .expect("Failed to create customer");
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to read response")
}

/// Test helper: delete a customer, ignoring failures.
async fn delete_customer(client: &Client, id: &str) {
    let _ = client
        .delete(format!("{}/customers/{id}", base_url()))
        .send()
        .await;
}

fn draft(name: &str, next_visit: &str, recurring: &str) -> Value {
    json!({
        "name": name,
        "email": null,
        "address": "1 Test Ln",
        "notes": null,
        "visit_time": "9:00",
        "price": "50.00",
        "price_type": "fixed",
        "recurring": recurring,
        "work_status": "pending",
        "payment_status": "pending",
        "next_visit": next_visit,
        "last_payment": null,
    })
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_customer_crud_round_trip() {
    let client = authenticated_client().await;
    let tomorrow = (Local::now().date_naive() + Days::new(1)).to_string();

    let created = create_customer(&client, draft("CRUD Test", &tomorrow, "weekly")).await;
    let id = created["id"].as_str().expect("id missing").to_string();
    assert_eq!(created["name"], "CRUD Test");
    assert_eq!(created["recurring"], "weekly");

    // Read it back
    let resp = client
        .get(format!("{}/customers/{id}", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    // Update the name
    let mut update = draft("CRUD Test Renamed", &tomorrow, "weekly");
    update["notes"] = json!("gate code 4411");
    let resp = client
        .put(format!("{}/customers/{id}", base_url()))
        .json(&update)
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Failed to read response");
    assert_eq!(updated["name"], "CRUD Test Renamed");
    assert_eq!(updated["notes"], "gate code 4411");

    // Delete
    let resp = client
        .delete(format!("{}/customers/{id}", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Gone
    let resp = client
        .get(format!("{}/customers/{id}", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_empty_name_is_rejected() {
    let client = authenticated_client().await;
    let tomorrow = (Local::now().date_naive() + Days::new(1)).to_string();

    let resp = client
        .post(format!("{}/customers", base_url()))
        .json(&draft("   ", &tomorrow, "none"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_unknown_customer_is_404() {
    let client = authenticated_client().await;
    let id = Uuid::new_v4();

    let resp = client
        .get(format!("{}/customers/{id}", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_complete_advances_weekly_schedule() {
    let client = authenticated_client().await;
    let today = Local::now().date_naive();
    let visit = today + Days::new(1);

    let created = create_customer(&client, draft("Complete Test", &visit.to_string(), "weekly")).await;
    let id = created["id"].as_str().expect("id missing").to_string();

    let resp = client
        .post(format!("{}/customers/{id}/complete", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let completed: Value = resp.json().await.expect("Failed to read response");

    assert_eq!(completed["work_status"], "completed");
    assert_eq!(completed["payment_status"], "pending");
    assert_eq!(
        completed["next_visit"],
        (visit + Days::new(7)).to_string(),
        "weekly schedule advances from the scheduled date, not today"
    );

    delete_customer(&client, &id).await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_list_marks_past_pending_visits_overdue() {
    let client = authenticated_client().await;
    let last_week = (Local::now().date_naive() - Days::new(7)).to_string();

    let created = create_customer(&client, draft("Overdue Test", &last_week, "none")).await;
    let id = created["id"].as_str().expect("id missing").to_string();
    assert_eq!(created["payment_status"], "pending");

    let resp = client
        .get(format!("{}/customers", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let customers: Vec<Value> = resp.json().await.expect("Failed to read response");

    let found = customers
        .iter()
        .find(|c| c["id"] == created["id"])
        .expect("created customer missing from list");
    assert_eq!(found["payment_status"], "overdue");

    delete_customer(&client, &id).await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_remind_without_email_is_rejected() {
    let client = authenticated_client().await;
    let tomorrow = (Local::now().date_naive() + Days::new(1)).to_string();

    let created = create_customer(&client, draft("No Email", &tomorrow, "none")).await;
    let id = created["id"].as_str().expect("id missing").to_string();

    let resp = client
        .post(format!("{}/customers/{id}/remind", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    delete_customer(&client, &id).await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_pdf_export_returns_pdf() {
    let client = authenticated_client().await;

    let resp = client
        .post(format!("{}/export/pdf", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/pdf")
    );
    let bytes = resp.bytes().await.expect("Failed to read body");
    assert!(bytes.starts_with(b"%PDF"));
}
