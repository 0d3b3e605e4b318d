use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Upstream service error: {0}")]
    Upstream(String),
    #[error("Internal server error")]
    Internal,
}

impl AppError {
    /// True when the storage layer rejected an insert because a concurrent
    /// request already claimed the same unique key (e.g. an ACTIVE booking
    /// for the same court, date and start time).
    pub fn is_unique_violation(&self) -> bool {
        if let AppError::Database(e) = self
            && let Some(db_err) = e.as_database_error()
        {
            let code = db_err.code().unwrap_or_default();

            // 2067 = SQLite Unique Constraint
            // 23505 = PostgreSQL Unique Violation
            return code == "2067" || code == "23505";
        }
        false
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_unique_violation() {
            return (
                StatusCode::CONFLICT,
                Json(json!({ "error": "Time slot already booked for this court and date" }))
            ).into_response();
        }

        let (status, message) = match &self {
            AppError::Database(e) => {
                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Upstream(msg) => {
                error!("Upstream failure: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
