//! API integration tests
//!
//! These tests expect a running server with a fresh database and the
//! bootstrap admin account. Run with: cargo test -- --ignored

use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an authenticated token
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "admin@localhost",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Register a visitor with unique contact details, returning its id
async fn register_visitor(client: &Client, token: &str) -> i64 {
    let unique = Utc::now().timestamp_micros();
    let response = client
        .post(format!("{}/visitors", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "full_name": "Test Visitor",
            "email": format!("visitor{}@example.com", unique),
            "phone": format!("+1555{:07}", unique % 10_000_000),
            "company": "Acme Corp"
        }))
        .send()
        .await
        .expect("Failed to register visitor");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["created"], true);
    body["visitor"]["id"].as_i64().expect("No visitor id")
}

/// Open a visit for a visitor, returning the visit id
async fn open_visit(client: &Client, token: &str, visitor_id: i64) -> i64 {
    let response = client
        .post(format!("{}/visits", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "visitor_id": visitor_id,
            "purpose": "Meeting",
            "estimated_departure": Utc::now() + Duration::hours(2)
        }))
        .send()
        .await
        .expect("Failed to open visit");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No visit id")
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "admin@localhost",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "admin@localhost",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_unauthenticated_request_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/visits", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_register_visitor_deduplicates() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let unique = Utc::now().timestamp_micros();
    let payload = json!({
        "full_name": "Dup Visitor",
        "email": format!("dup{}@example.com", unique),
        "phone": format!("+1556{:07}", unique % 10_000_000)
    });

    let first = client
        .post(format!("{}/visitors", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status(), 201);
    let first_body: Value = first.json().await.expect("Failed to parse response");

    // Same email: existing visitor comes back instead of a new row
    let second = client
        .post(format!("{}/visitors", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), 200);
    let second_body: Value = second.json().await.expect("Failed to parse response");

    assert_eq!(second_body["created"], false);
    assert_eq!(second_body["visitor"]["id"], first_body["visitor"]["id"]);
}

#[tokio::test]
#[ignore]
async fn test_visit_lifecycle() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let visitor_id = register_visitor(&client, &token).await;
    let visit_id = open_visit(&client, &token, visitor_id).await;

    // Visit appears in the active list
    let active = client
        .get(format!("{}/visits", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to list active visits");
    assert!(active.status().is_success());
    let active_body: Value = active.json().await.expect("Failed to parse response");
    assert!(active_body
        .as_array()
        .expect("Expected array")
        .iter()
        .any(|v| v["id"].as_i64() == Some(visit_id)));

    // Checkout
    let checkout = client
        .post(format!("{}/visits/{}/checkout", BASE_URL, visit_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "notes": "Left on time" }))
        .send()
        .await
        .expect("Failed to checkout visit");
    assert!(checkout.status().is_success());
    let checked_out: Value = checkout.json().await.expect("Failed to parse response");
    assert_eq!(checked_out["status"], "COMPLETED");
    assert!(checked_out["actual_departure"].is_string());

    // Second checkout is rejected
    let again = client
        .post(format!("{}/visits/{}/checkout", BASE_URL, visit_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(again.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_open_visit_with_invalid_window() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let visitor_id = register_visitor(&client, &token).await;

    // Estimated departure before arrival
    let response = client
        .post(format!("{}/visits", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "visitor_id": visitor_id,
            "estimated_departure": Utc::now() - Duration::hours(1)
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_tag_assignment_lifecycle() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    // Register a tag
    let unique = Utc::now().timestamp_micros();
    let created = client
        .post(format!("{}/tags", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "tag_number": format!("T-{}", unique) }))
        .send()
        .await
        .expect("Failed to create tag");
    assert_eq!(created.status(), 201);
    let tag: Value = created.json().await.expect("Failed to parse response");
    let tag_id = tag["id"].as_i64().expect("No tag id");
    assert_eq!(tag["status"], "AVAILABLE");

    let visitor_id = register_visitor(&client, &token).await;
    let visit_id = open_visit(&client, &token, visitor_id).await;

    // Assign
    let assigned = client
        .post(format!("{}/tags/{}/assign", BASE_URL, tag_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "visit_id": visit_id }))
        .send()
        .await
        .expect("Failed to assign tag");
    assert!(assigned.status().is_success());
    let assigned_body: Value = assigned.json().await.expect("Failed to parse response");
    assert_eq!(assigned_body["status"], "IN_USE");
    assert_eq!(assigned_body["current_visit_id"], visit_id);

    // The visit records the tag too, so checkout can release it
    let visit = client
        .get(format!("{}/visits/{}", BASE_URL, visit_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to get visit");
    let visit_body: Value = visit.json().await.expect("Failed to parse response");
    assert_eq!(visit_body["tag_id"], tag_id);

    // A tag already in use cannot be assigned again
    let other_visit = open_visit(&client, &token, visitor_id).await;
    let conflict = client
        .post(format!("{}/tags/{}/assign", BASE_URL, tag_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "visit_id": other_visit }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(conflict.status(), 422);

    // Release with the wrong visit id is rejected
    let mismatch = client
        .post(format!("{}/tags/{}/release", BASE_URL, tag_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "visit_id": other_visit }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(mismatch.status(), 409);

    // Checkout releases the tag
    let checkout = client
        .post(format!("{}/visits/{}/checkout", BASE_URL, visit_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to checkout visit");
    assert!(checkout.status().is_success());

    let tag_after = client
        .get(format!("{}/tags/{}", BASE_URL, tag_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to get tag");
    let tag_after_body: Value = tag_after.json().await.expect("Failed to parse response");
    assert_eq!(tag_after_body["status"], "AVAILABLE");
    assert!(tag_after_body["current_visit_id"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_duplicate_tag_number_rejected() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let number = format!("D-{}", Utc::now().timestamp_micros());
    let first = client
        .post(format!("{}/tags", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "tag_number": number }))
        .send()
        .await
        .expect("Failed to create tag");
    assert_eq!(first.status(), 201);

    let second = client
        .post(format!("{}/tags", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "tag_number": number }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_second_tag_for_same_visit_rejected() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let unique = Utc::now().timestamp_micros();
    let mut tag_ids = Vec::new();
    for suffix in ["a", "b"] {
        let created = client
            .post(format!("{}/tags", BASE_URL))
            .header("Authorization", format!("Bearer {}", token))
            .json(&json!({ "tag_number": format!("S-{}-{}", unique, suffix) }))
            .send()
            .await
            .expect("Failed to create tag");
        assert_eq!(created.status(), 201);
        let tag: Value = created.json().await.expect("Failed to parse response");
        tag_ids.push(tag["id"].as_i64().expect("No tag id"));
    }

    let visitor_id = register_visitor(&client, &token).await;
    let visit_id = open_visit(&client, &token, visitor_id).await;

    let first = client
        .post(format!("{}/tags/{}/assign", BASE_URL, tag_ids[0]))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "visit_id": visit_id }))
        .send()
        .await
        .expect("Failed to assign tag");
    assert!(first.status().is_success());

    // The visit already holds a tag; it must be released first
    let second = client
        .post(format!("{}/tags/{}/assign", BASE_URL, tag_ids[1]))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "visit_id": visit_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), 409);

    // After releasing, the replacement goes through
    let released = client
        .post(format!("{}/tags/{}/release", BASE_URL, tag_ids[0]))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "visit_id": visit_id }))
        .send()
        .await
        .expect("Failed to release tag");
    assert!(released.status().is_success());

    let replacement = client
        .post(format!("{}/tags/{}/assign", BASE_URL, tag_ids[1]))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "visit_id": visit_id }))
        .send()
        .await
        .expect("Failed to assign tag");
    assert!(replacement.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_concurrent_assignment_single_winner() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let unique = Utc::now().timestamp_micros();
    let created = client
        .post(format!("{}/tags", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "tag_number": format!("C-{}", unique) }))
        .send()
        .await
        .expect("Failed to create tag");
    assert_eq!(created.status(), 201);
    let tag: Value = created.json().await.expect("Failed to parse response");
    let tag_id = tag["id"].as_i64().expect("No tag id");

    let visitor_id = register_visitor(&client, &token).await;
    let visit_a = open_visit(&client, &token, visitor_id).await;
    let visit_b = open_visit(&client, &token, visitor_id).await;

    let assign = |visit_id: i64| {
        let client = client.clone();
        let token = token.clone();
        async move {
            client
                .post(format!("{}/tags/{}/assign", BASE_URL, tag_id))
                .header("Authorization", format!("Bearer {}", token))
                .json(&json!({ "visit_id": visit_id }))
                .send()
                .await
                .expect("Failed to send request")
                .status()
        }
    };

    // Both racers target the same tag; the row lock serializes them and
    // exactly one wins
    let (first, second) = tokio::join!(assign(visit_a), assign(visit_b));
    let successes = [first, second]
        .iter()
        .filter(|s| s.is_success())
        .count();
    assert_eq!(successes, 1);
    assert!([first, second].contains(&reqwest::StatusCode::UNPROCESSABLE_ENTITY));
}

#[tokio::test]
#[ignore]
async fn test_extend_visit_validates_window() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let visitor_id = register_visitor(&client, &token).await;
    let visit_id = open_visit(&client, &token, visitor_id).await;

    // Extension before arrival time is rejected
    let bad = client
        .post(format!("{}/visits/{}/extend", BASE_URL, visit_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "new_estimated_departure": Utc::now() - Duration::hours(2) }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(bad.status(), 400);

    // A valid extension moves the visit to EXTENDED
    let good = client
        .post(format!("{}/visits/{}/extend", BASE_URL, visit_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "new_estimated_departure": Utc::now() + Duration::hours(4) }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(good.status().is_success());
    let body: Value = good.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "EXTENDED");
}

#[tokio::test]
#[ignore]
async fn test_sweep_run_is_idempotent() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let first = client
        .post(format!("{}/sweep/run", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to run sweep");
    assert!(first.status().is_success());

    // A second pass right after finds nothing left to check out
    let second = client
        .post(format!("{}/sweep/run", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to run sweep");
    assert!(second.status().is_success());
    let body: Value = second.json().await.expect("Failed to parse response");
    assert_eq!(body["checked_out"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore]
async fn test_dashboard_stats() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to get stats");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["visits"]["active"].is_number());
    assert!(body["visitors"]["active"].is_number());
    assert!(body["tags"]["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_settings_update() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .put(format!("{}/settings", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "auto_checkout_grace_minutes": 20 }))
        .send()
        .await
        .expect("Failed to update settings");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["auto_checkout_grace_minutes"], 20);
}
