use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum HubError {
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A connection could not be opened or borrowed from the pool.
    #[error("Database connection failed: {0}")]
    Connection(#[source] SqlxError),

    /// A statement failed on an established connection.
    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),
}

impl HubError {
    pub fn is_connection(&self) -> bool {
        matches!(self, HubError::Connection(_))
    }
}

/// Failure of the `/data` route, rendered as `{"error": "..."}`.
///
/// The body text is fixed by existing clients. Driver detail is only
/// appended when `expose_detail` is set.
#[derive(Debug)]
pub struct DataRouteError {
    pub source: HubError,
    pub expose_detail: bool,
}

impl IntoResponse for DataRouteError {
    fn into_response(self) -> axum::response::Response {
        let message = match &self.source {
            HubError::Connection(_) => "Database connection failed".to_string(),
            HubError::DatabaseError(e) if self.expose_detail => {
                format!("Failed to fetch data: {e}")
            }
            _ => "Failed to fetch data".to_string(),
        };
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiErrorResponse { error: message }),
        )
            .into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: String,
}
