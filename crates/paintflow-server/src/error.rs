//! HTTP error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use paintflow_core::storage::StoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing data")]
    MissingData,
    #[error("Not found")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    /// Store failure; the message is the public one, details are logged.
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    /// Map a store failure, using `context` as the message for server faults.
    pub fn store(err: StoreError, context: &'static str) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::Serialization(msg) => ApiError::BadRequest(msg),
            other => {
                tracing::error!("{context}: {other}");
                ApiError::Internal(context)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingData | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mapping() {
        let not_found = ApiError::store(StoreError::NotFound("x".into()), "Failed to fetch drawing");
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "Not found");

        let io = ApiError::store(StoreError::Io("disk full".into()), "Failed to save drawing");
        assert_eq!(io.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(io.to_string(), "Failed to save drawing");

        let bad = ApiError::store(StoreError::Serialization("bad preview".into()), "Failed to save drawing");
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_response_status() {
        assert_eq!(ApiError::MissingData.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
