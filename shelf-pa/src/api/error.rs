//! API error responses
//!
//! Every failure renders as `{ "error": message }` with a matching status.

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Database(String),
    Internal(String),
}

impl From<shelf_common::Error> for ApiError {
    fn from(e: shelf_common::Error) -> Self {
        match e {
            shelf_common::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            shelf_common::Error::NotFound(msg) => ApiError::NotFound(msg),
            shelf_common::Error::Database(e) => ApiError::Database(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Database(msg) => {
                // Driver detail stays in the log
                error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
