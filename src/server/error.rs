use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::error::ForecastError;

/// Error returned by the route handlers, rendered as `{"error": "..."}`.
///
/// Handlers produce it from a [`ForecastError`] or, for query parameters
/// that fail validation, through [`AppError::unprocessable`].
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// Request parameters failed validation (FastAPI-compatible 422).
    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<ForecastError> for AppError {
    fn from(e: ForecastError) -> Self {
        let status = match &e {
            ForecastError::NoDataForYear(_) => StatusCode::NOT_FOUND,
            _ => {
                tracing::error!(error = %e, "forecast failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}
