use axum::{Router, routing::get};

use crate::config::ApiConfig;
use crate::db::PassengerStorage;
use crate::handlers::{passengers, service};

/// Shared state handed to every handler. Cheap to clone.
#[derive(Clone)]
pub struct HubState {
    pub storage: PassengerStorage,
    pub expose_error_detail: bool,
}

impl HubState {
    pub fn new(storage: PassengerStorage, expose_error_detail: bool) -> Self {
        Self {
            storage,
            expose_error_detail,
        }
    }

    /// Lazily-connecting pool built from the service configuration.
    pub fn from_config(cfg: &ApiConfig) -> Self {
        Self::new(
            PassengerStorage::connect_lazy(cfg),
            cfg.expose_error_detail,
        )
    }
}

pub fn hub_router(state: HubState) -> Router {
    Router::new()
        .route("/", get(service::hello))
        .route("/status", get(service::status))
        .route("/data", get(passengers::data_handler))
        .with_state(state)
}
