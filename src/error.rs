//! Application error type and its HTTP mapping.
//!
//! Every error reaching the client is rendered as the uniform envelope
//! `{"statusCode": <int>, "message": <string>}`. Internal failures are logged
//! with their details and surfaced with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input or a conflict the client can correct (400)
    #[error("{0}")]
    BadRequest(String),

    /// Missing or unusable credentials (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but lacking the required role (403)
    #[error("{0}")]
    Forbidden(String),

    /// Lookup failure, including unknown roles and inactive accounts (404)
    #[error("{0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Pool(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed with internal error");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = axum::Json(json!({
            "statusCode": status.as_u16(),
            "message": message,
        }));

        (status, body).into_response()
    }
}
