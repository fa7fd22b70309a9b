//! Cache handlers

use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
pub struct CacheValueResponse {
    key: String,
    value: String,
}

#[derive(Debug, Serialize)]
pub struct CacheSetResponse {
    status: &'static str,
    key: String,
    value: String,
}

pub async fn get(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<CacheValueResponse>, ApiError> {
    let value = state.deps.get_value(&key).await?;
    debug!("Cache hit for key: {}", key);

    Ok(Json(CacheValueResponse { key, value }))
}

pub async fn set(
    State(state): State<AppState>,
    Path((key, value)): Path<(String, String)>,
) -> Result<Json<CacheSetResponse>, ApiError> {
    state.deps.set_value(&key, &value).await?;
    debug!("Cache set for key: {}", key);

    Ok(Json(CacheSetResponse {
        status: "ok",
        key,
        value,
    }))
}
