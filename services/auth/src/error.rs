//! Error type for authentication and authorization failures

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::jwt::TokenError;

/// Custom error type for authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Missing, invalid, expired or revoked token
    #[error("{0}")]
    Unauthenticated(&'static str),

    /// Valid token, wrong role
    #[error("Access denied")]
    Forbidden,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("User already exists")]
    DuplicateEmail,

    #[error("Admin already initialized")]
    AlreadyInitialized,

    /// Customer login mismatch; deliberately does not say which field
    #[error("Invalid Credentials")]
    InvalidCredentials,

    #[error("Invalid username")]
    InvalidUsername,

    #[error("Invalid secret key")]
    InvalidSecretKey,

    #[error("Invalid recovery key")]
    InvalidRecoveryKey,

    #[error("Secret key reset is disabled")]
    RecoveryDisabled,

    #[error("Too many attempts, try again later")]
    TooManyAttempts,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::Unauthenticated(_) => "unauthenticated",
            AuthError::Forbidden => "forbidden",
            AuthError::NotFound(_) => "not_found",
            AuthError::DuplicateEmail => "duplicate_email",
            AuthError::AlreadyInitialized => "already_initialized",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InvalidUsername => "invalid_username",
            AuthError::InvalidSecretKey => "invalid_secret_key",
            AuthError::InvalidRecoveryKey => "invalid_recovery_key",
            AuthError::RecoveryDisabled => "recovery_disabled",
            AuthError::TooManyAttempts => "too_many_attempts",
            AuthError::Validation(_) => "validation_error",
            AuthError::Database(_) | AuthError::Internal(_) => "server_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Unauthenticated(_)
            | AuthError::InvalidUsername
            | AuthError::InvalidSecretKey
            | AuthError::InvalidRecoveryKey => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden | AuthError::RecoveryDisabled => StatusCode::FORBIDDEN,
            AuthError::NotFound(_) => StatusCode::NOT_FOUND,
            AuthError::DuplicateEmail
            | AuthError::AlreadyInitialized
            | AuthError::InvalidCredentials
            | AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn internal(err: impl std::fmt::Display) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InvalidToken => AuthError::Unauthenticated("Token is not valid"),
            TokenError::Expired => AuthError::Unauthenticated("Token has expired"),
            other => AuthError::internal(other),
        }
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AuthError::Database(e) => {
                error!("Storage failure: {}", e);
                "Server Error".to_string()
            }
            AuthError::Internal(e) => {
                error!("Internal failure: {}", e);
                "Server Error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": self.kind(),
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for auth results
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_errors_become_unauthenticated() {
        let err: AuthError = TokenError::Expired.into();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Token has expired");

        let err: AuthError = TokenError::InvalidToken.into();
        assert_eq!(err.kind(), "unauthenticated");
    }

    #[test]
    fn storage_failures_are_opaque() {
        let err = AuthError::Database(DatabaseError::Migration("boom".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.kind(), "server_error");
    }

    #[test]
    fn admin_login_failures_stay_distinct() {
        assert_ne!(
            AuthError::InvalidUsername.to_string(),
            AuthError::InvalidSecretKey.to_string()
        );
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Invalid Credentials");
    }
}
