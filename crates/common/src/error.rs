use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Common error types used across the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Template error: {0}")]
    Template(String),

    #[error("Queue error: {0}")]
    Queue(String),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Template(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            AppError::Queue(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            AppError::Notify(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = json!({ "error": message });
        (status, Json(body)).into_response()
    }
}
