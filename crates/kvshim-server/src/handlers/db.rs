//! Database probe handler

use crate::error::ApiError;
use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DbProbeResponse {
    postgres_version: String,
    status: &'static str,
}

pub async fn probe(State(state): State<AppState>) -> Result<Json<DbProbeResponse>, ApiError> {
    let postgres_version = state.deps.database_version().await?;

    Ok(Json(DbProbeResponse {
        postgres_version,
        status: "success",
    }))
}
