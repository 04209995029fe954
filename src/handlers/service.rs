use axum::Json;
use serde::Serialize;

pub const HELLO: &str = "Hello from Axum API Service!";

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub framework: &'static str,
}

/// GET / -> liveness string.
pub async fn hello() -> &'static str {
    HELLO
}

/// GET /status -> fixed payload, touches nothing.
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "API service is running",
        framework: "Axum",
    })
}
