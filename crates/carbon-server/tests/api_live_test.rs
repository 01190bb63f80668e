//! Live server integration tests.
//!
//! Run with: cargo test --test api_live_test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

fn base_url() -> String {
    std::env::var("CARBON_TEST_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

async fn register(client: &Client, base: &str) -> String {
    let email = format!("live-{}@example.com", uuid::Uuid::new_v4());
    let resp = client
        .post(format!("{}/api/v1/auth/register", base))
        .json(&json!({
            "email": email,
            "password": "live-test-password",
            "full_name": "Live Test"
        }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status().as_u16(), 201, "Registration should succeed");

    let resp = client
        .post(format!("{}/api/v1/auth/token", base))
        .form(&[("username", email.as_str()), ("password", "live-test-password")])
        .send()
        .await
        .expect("Failed to log in");
    assert!(resp.status().is_success(), "Login should succeed");
    let body: Value = resp.json().await.unwrap();
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
#[ignore]
async fn test_health() {
    let resp = Client::new()
        .get(format!("{}/api/v1/health", base_url()))
        .send()
        .await
        .expect("Server should be reachable");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

/// Save a search, find it in the listing, then delete it.
#[tokio::test]
#[ignore]
async fn test_search_round_trip() {
    let client = Client::new();
    let base = base_url();
    let token = register(&client, &base).await;

    let resp = client
        .post(format!("{}/api/v1/searches", base))
        .bearer_auth(&token)
        .json(&json!({
            "origin_name": "Mumbai, India",
            "origin_coordinates": { "latitude": 19.0760, "longitude": 72.8777 },
            "destination_name": "Dubai, UAE",
            "destination_coordinates": { "latitude": 25.2048, "longitude": 55.2708 },
            "weight_kg": 5000.0
        }))
        .send()
        .await
        .expect("Failed to create search");
    assert_eq!(resp.status().as_u16(), 201);
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_str().unwrap();
    assert_eq!(created["detailed_routes"].as_array().unwrap().len(), 3);

    let resp = client
        .get(format!("{}/api/v1/searches", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let listing: Value = resp.json().await.unwrap();
    let found = listing["items"]
        .as_array()
        .unwrap()
        .iter()
        .any(|s| s["id"].as_str() == Some(id));
    assert!(found, "Created search should appear in list");

    let resp = client
        .delete(format!("{}/api/v1/searches/{}", base, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 204);
}
