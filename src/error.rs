use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::detector::DetectionError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Request must be JSON.")]
    NotJson,

    #[error("Request body too large.")]
    PayloadTooLarge,

    #[error("{0}")]
    InvalidRequest(serde_json::Error),

    #[error("{0}")]
    Detection(#[from] DetectionError),

    #[error("Failed to read request body: {0}")]
    Body(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotJson => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::InvalidRequest(_) | AppError::Detection(_) | AppError::Body(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Prediction failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Rejected request");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
