//! Router tests that run without a database.
//!
//! The pool points at a closed port, so `/data` exercises the
//! connection-failure path while `/` and `/status` stay independent of it.

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use passenger_hub::config::ApiConfig;
use passenger_hub::router::{HubState, hub_router};
use serde_json::Value;
use tower::ServiceExt;

fn unreachable_config() -> ApiConfig {
    ApiConfig {
        db_host: "127.0.0.1".to_string(),
        db_port: 1,
        db_acquire_timeout_secs: 1,
        ..ApiConfig::default()
    }
}

async fn get(uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let app = hub_router(HubState::from_config(&unreachable_config()));
    let resp = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    let status = resp.status();
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    (status, content_type, body.to_vec())
}

#[tokio::test]
async fn root_returns_liveness_text() {
    let (status, content_type, body) = get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap_or_default().starts_with("text/plain"));
    assert_eq!(body, b"Hello from Axum API Service!");
}

#[tokio::test]
async fn status_is_fixed_even_without_database() {
    let (status, _, body) = get("/status").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).expect("status body should be JSON");
    assert_eq!(json["status"], "API service is running");
    assert_eq!(json["framework"], "Axum");
    assert_eq!(json.as_object().map(|o| o.len()), Some(2));

    let (_, _, again) = get("/status").await;
    assert_eq!(body, again);
}

#[tokio::test]
async fn data_reports_connection_failure_as_500() {
    let (status, _, body) = get("/data").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = serde_json::from_slice(&body).expect("error body should be JSON");
    assert_eq!(json["error"], "Database connection failed");
    assert!(json.get("passengers").is_none());
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (status, _, _) = get("/passengers").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
