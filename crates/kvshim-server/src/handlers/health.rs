//! Composite health handler

use crate::AppState;
use axum::{extract::State, Json};
use kvshim_core::HealthReport;

/// Always 200; per-dependency failures only show up in the body.
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(kvshim_core::health::check(&state.deps).await)
}
