//! HTTP status mapping for `AppError`. Bodies are flat `{"error": "..."}`
//! objects, the shape the scanner and URL-checker frontends expect.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::utils::error::AppError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::ValidationError { message } => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::UpstreamUnavailable { .. } => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::ApiError(_) => (
                StatusCode::BAD_GATEWAY,
                "Upstream request failed".to_string(),
            ),
            AppError::MissingConfigError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            _ => {
                // Internal details go to the log, not to the client.
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Processing Error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
