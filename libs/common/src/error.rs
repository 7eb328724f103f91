//! Storage error types shared by every service
//!
//! Repositories (Postgres and in-memory alike) report failures through
//! [`DatabaseError`] so handlers can map them without knowing the backend.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),

    /// A uniqueness constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    /// The addressed record does not exist
    #[error("Record not found")]
    NotFound,
}

impl DatabaseError {
    /// Classify a query failure, surfacing unique violations as [`DatabaseError::Conflict`]
    pub fn from_query(err: SqlxError) -> Self {
        if let SqlxError::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                return DatabaseError::Conflict(constraint);
            }
        }
        DatabaseError::Query(err)
    }

    /// Whether this error is a uniqueness violation
    pub fn is_conflict(&self) -> bool {
        matches!(self, DatabaseError::Conflict(_))
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_is_a_plain_query_error() {
        let err = DatabaseError::from_query(SqlxError::RowNotFound);
        assert!(matches!(err, DatabaseError::Query(_)));
        assert!(!err.is_conflict());
    }

    #[test]
    fn conflict_reports_constraint() {
        let err = DatabaseError::Conflict("customers_email_key".to_string());
        assert!(err.is_conflict());
        assert_eq!(
            err.to_string(),
            "Unique constraint violated: customers_email_key"
        );
    }
}
