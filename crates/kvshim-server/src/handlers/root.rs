//! Service description handler

use crate::AppState;
use axum::{extract::State, Json};
use kvshim_core::Availability;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    message: &'static str,
    services: Services,
    endpoints: Endpoints,
}

/// Startup acquisition state, not a live check
#[derive(Debug, Serialize)]
pub struct Services {
    redis: Availability,
    postgresql: Availability,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    health_check: &'static str,
    cache_get: &'static str,
    cache_set: &'static str,
    db_test: &'static str,
}

pub async fn root(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "kvshim: Redis cache and PostgreSQL probe",
        services: Services {
            redis: state.deps.cache_availability(),
            postgresql: state.deps.database_availability(),
        },
        endpoints: Endpoints {
            health_check: "/health",
            cache_get: "/cache/{key}",
            cache_set: "/cache/{key}/{value}",
            db_test: "/db",
        },
    })
}
