//! API error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kvshim_core::KvShimError;
use serde_json::json;
use tracing::{error, warn};

/// Error returned by handlers, rendered as `{"error": .., "code": ..}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self.status {
            StatusCode::NOT_FOUND => "not_found",
            StatusCode::SERVICE_UNAVAILABLE => "service_unavailable",
            _ => "internal_error",
        }
    }
}

impl From<KvShimError> for ApiError {
    fn from(e: KvShimError) -> Self {
        let status = match &e {
            KvShimError::NotFound(_) => StatusCode::NOT_FOUND,
            KvShimError::Unavailable(_) | KvShimError::Transient { .. } => {
                warn!("{}", e);
                StatusCode::SERVICE_UNAVAILABLE
            }
            KvShimError::Config(_) => {
                error!("{}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "code": self.code(),
        }));
        (self.status, body).into_response()
    }
}
