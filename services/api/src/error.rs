//! Custom error types for the API service

use auth::AuthError;
use axum::{
    Json,
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::models::OrderStatus;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Authentication, authorization and account errors
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Payment screenshot is required")]
    MissingProof,

    #[error("Images only: jpeg, jpg, png or gif")]
    InvalidFileType,

    #[error("File too large")]
    FileTooLarge,

    #[error("{0}")]
    Validation(String),

    #[error("Cannot move an order from {from} to {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Stable machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Auth(e) => e.kind(),
            ApiError::NotFound(_) => "not_found",
            ApiError::MissingProof => "missing_proof",
            ApiError::InvalidFileType => "invalid_file_type",
            ApiError::FileTooLarge => "file_too_large",
            ApiError::Validation(_) => "validation_error",
            ApiError::IllegalTransition { .. } => "illegal_transition",
            ApiError::Database(_) | ApiError::Internal(_) => "server_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(e) => e.status(),
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MissingProof | ApiError::InvalidFileType | ApiError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::IllegalTransition { .. } => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::FileTooLarge
        } else {
            ApiError::Validation(err.body_text())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match self {
            ApiError::Auth(e) => return e.into_response(),
            ApiError::Database(ref e) => {
                error!("Storage failure: {}", e);
                "Server Error".to_string()
            }
            ApiError::Internal(ref e) => {
                error!("Internal failure: {}", e);
                "Server Error".to_string()
            }
            ref other => other.to_string(),
        };

        let body = Json(json!({
            "error": self.kind(),
            "message": message,
        }));

        (self.status(), body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_errors_map_to_client_statuses() {
        assert_eq!(ApiError::MissingProof.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidFileType.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::FileTooLarge.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            ApiError::MissingProof.to_string(),
            "Payment screenshot is required"
        );
    }

    #[test]
    fn illegal_transition_is_a_conflict() {
        let err = ApiError::IllegalTransition {
            from: OrderStatus::Done,
            to: OrderStatus::Pending,
        };
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "Cannot move an order from Done to Pending");
    }

    #[test]
    fn auth_errors_keep_their_status() {
        let err = ApiError::from(AuthError::Forbidden);
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.kind(), "forbidden");
    }
}
