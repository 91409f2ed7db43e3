use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::BookingStatus;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("worker unavailable: {0}")]
    WorkerUnavailable(String),

    #[error("invalid transition: cannot {action} a {} booking", .from.as_str())]
    InvalidTransition { from: BookingStatus, action: String },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("settlement failed: {0}")]
    Settlement(String),

    #[error("unauthorized")]
    Unauthorized,
}

impl AppError {
    pub fn invalid_transition(from: BookingStatus, action: &str) -> Self {
        AppError::InvalidTransition {
            from,
            action: action.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::WorkerUnavailable(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Settlement(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
