//! End-to-end tests for the items API.
//!
//! Each test boots the full router on an ephemeral port backed by a private
//! in-memory database and talks to it over real HTTP.
//! Run with: cargo test --test integration

use std::net::SocketAddr;

use items_api::api::{cors_layer, create_router, AppState};
use items_api::config::Config;
use items_api::db;
use items_api::metrics::detached_handle;
use items_api::store::ItemStore;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Spawn a server and return its base URL.
async fn spawn_app() -> String {
    let pool = db::connect_in_memory().await.expect("in-memory database");
    db::migrate(&pool).await.expect("migrations");

    let state = AppState::new(ItemStore::new(pool), detached_handle());
    let router = create_router(state).layer(cors_layer(&Config::default()));

    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server");
    });

    format!("http://{}/api", addr)
}

#[tokio::test]
async fn test_health_returns_empty_body() {
    let base = spawn_app().await;

    let response = reqwest::get(format!("{base}/health/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "");
}

#[tokio::test]
async fn test_hello_message() {
    let base = spawn_app().await;

    let response = reqwest::get(format!("{base}/hello/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Hello from Django!" }));
}

#[tokio::test]
async fn test_create_then_list() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let mut created = Vec::new();
    for name in ["A", "B"] {
        let response = client
            .post(format!("{base}/items/"))
            .json(&json!({ "name": name }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let item: Value = response.json().await.unwrap();
        assert!(item["id"].as_i64().unwrap() > 0);
        assert!(!item["created_at"].is_null());
        created.push(item);
    }

    let response = client.get(format!("{base}/items/")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed: Vec<Value> = response.json().await.unwrap();

    assert_eq!(listed, created);
}

#[tokio::test]
async fn test_create_validation_errors() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let too_long = client
        .post(format!("{base}/items/"))
        .json(&json!({ "name": "x".repeat(101) }))
        .send()
        .await
        .unwrap();
    assert_eq!(too_long.status(), StatusCode::BAD_REQUEST);
    let body: Value = too_long.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "name": ["Ensure this field has no more than 100 characters."] })
    );

    let missing = client
        .post(format!("{base}/items/"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body, json!({ "name": ["This field is required."] }));

    let listed: Vec<Value> = client
        .get(format!("{base}/items/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.is_empty());
}
