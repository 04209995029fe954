use axum::{Json, extract::State};
use serde::Serialize;
use tracing::{error, warn};

use crate::db::Passenger;
use crate::error::DataRouteError;
use crate::router::HubState;

#[derive(Debug, Serialize)]
pub struct PassengersResponse {
    pub message: &'static str,
    pub passengers: Vec<Passenger>,
}

/// GET /data -> first rows of `passengers`.
pub async fn data_handler(
    State(state): State<HubState>,
) -> Result<Json<PassengersResponse>, DataRouteError> {
    match state.storage.sample().await {
        Ok(passengers) => Ok(Json(PassengersResponse {
            message: "Data from MySQL",
            passengers,
        })),
        Err(e) => {
            if e.is_connection() {
                warn!(error = %e, "error connecting to database");
            } else {
                error!(error = %e, "error fetching data");
            }
            Err(DataRouteError {
                source: e,
                expose_detail: state.expose_error_detail,
            })
        }
    }
}
