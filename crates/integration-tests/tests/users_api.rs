//! End-to-end tests for the `/users` CRUD routes.
//!
//! Each test starts its own server on an ephemeral port with a private data
//! file, so they run in parallel without coordination.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use client_registry_integration_tests::{TestServer, valid_payload};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;
    let resp = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_fresh_start_serves_seed_records() {
    let server = TestServer::start().await;

    let resp = server.client.get(server.url("/users")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let users: Vec<Value> = resp.json().await.unwrap();
    let ids: Vec<u64> = users.iter().map(|u| u["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    // Seed was written through to disk
    let on_disk: Vec<Value> =
        serde_json::from_str(&std::fs::read_to_string(server.data_file()).unwrap()).unwrap();
    assert_eq!(on_disk, users);
}

#[tokio::test]
async fn test_corrupt_data_file_falls_back_to_seed() {
    let server = TestServer::with_data_file("{ not json").await;

    let users: Vec<Value> = server
        .client
        .get(server.url("/users"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(users.len(), 3);
}

#[tokio::test]
async fn test_create_get_delete_round_trip() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .post(server.url("/users"))
        .json(&valid_payload())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["id"], 4);
    assert_eq!(created["name"], "Ana Silva");
    assert_eq!(created["taxId"], "52998224725");

    let resp = server.client.get(server.url("/users/4")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Value = resp.json().await.unwrap();
    assert_eq!(fetched, created);

    let resp = server.client.delete(server.url("/users/4")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let deleted: Value = resp.json().await.unwrap();
    assert_eq!(deleted, created);

    let resp = server.client.get(server.url("/users/4")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Client 4 not found" }));
}

#[tokio::test]
async fn test_create_reports_every_invalid_field() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .post(server.url("/users"))
        .json(&json!({
            "name": "Al",
            "email": "bad",
            "taxId": "000",
            "postalCode": "123"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Validation failed");
    let errors = body["errors"].as_object().unwrap();
    for field in ["name", "email", "taxId", "postalCode"] {
        assert!(errors.contains_key(field), "missing error for {field}");
    }

    // Nothing was stored
    let users: Vec<Value> = server
        .client
        .get(server.url("/users"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(users.len(), 3);
}

#[tokio::test]
async fn test_create_rejects_client_supplied_id() {
    let server = TestServer::start().await;
    let mut payload = valid_payload();
    payload["id"] = json!(99);

    let resp = server
        .client
        .post(server.url("/users"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errors"]["id"], json!(["is not allowed"]));
}

#[tokio::test]
async fn test_malformed_json_is_a_validation_error() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .post(server.url("/users"))
        .header("content-type", "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Validation failed");
    assert!(body["errors"]["body"].is_array());
}

#[tokio::test]
async fn test_update_merges_and_keeps_id() {
    let server = TestServer::start().await;

    let before: Value = server
        .client
        .get(server.url("/users/2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let resp = server
        .client
        .put(server.url("/users/2"))
        .json(&json!({ "name": "Bruno Lima", "neighborhood": "Centro" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.unwrap();

    assert_eq!(updated["id"], 2);
    assert_eq!(updated["name"], "Bruno Lima");
    assert_eq!(updated["neighborhood"], "Centro");
    assert_eq!(updated["email"], before["email"]);
    assert_eq!(updated["taxId"], before["taxId"]);
}

#[tokio::test]
async fn test_update_validation_and_missing_ids() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .put(server.url("/users/1"))
        .json(&json!({ "email": "not-an-email" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = server
        .client
        .put(server.url("/users/42"))
        .json(&json!({ "name": "Nobody Here" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = server.client.delete(server.url("/users/42")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = server.client.get(server.url("/users/abc")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_with_exhausted_ids_is_internal_error() {
    let mut highest = valid_payload();
    highest["id"] = json!(u32::MAX);
    let server = TestServer::with_data_file(&json!([highest]).to_string()).await;

    let resp = server
        .client
        .post(server.url("/users"))
        .json(&valid_payload())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Internal server error" }));

    let users: Vec<Value> = server
        .client
        .get(server.url("/users"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<u64> = users.iter().map(|u| u["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![u64::from(u32::MAX)]);
}

#[tokio::test]
async fn test_undecodable_path_id_is_not_found() {
    let server = TestServer::start().await;

    for path in ["/users/%FF", "/users/isCPF/%FF", "/users/isCEP/%FF"] {
        let resp = server.client.get(server.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{path}");
        assert!(
            resp.headers()["content-type"]
                .to_str()
                .unwrap()
                .starts_with("application/json")
        );
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({ "message": "Client %FF not found" }));
    }

    let resp = server
        .client
        .delete(server.url("/users/%FF"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mutations_survive_restart() {
    let server = TestServer::start().await;

    let created: Value = server
        .client
        .post(server.url("/users"))
        .json(&valid_payload())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    server
        .client
        .delete(server.url("/users/1"))
        .send()
        .await
        .unwrap();

    let restarted = server.restart().await;
    let users: Vec<Value> = restarted
        .client
        .get(restarted.url("/users"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let ids: Vec<u64> = users.iter().map(|u| u["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![2, 3, 4]);
    assert_eq!(users[2], created);
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .get(server.url("/users"))
        .header("x-request-id", "trace-me-123")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["x-request-id"], "trace-me-123");

    let resp = server.client.get(server.url("/users")).send().await.unwrap();
    let generated = resp.headers()["x-request-id"].to_str().unwrap();
    assert!(!generated.is_empty());
}
