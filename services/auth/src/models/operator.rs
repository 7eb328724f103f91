//! Operator (admin) model

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Operator entity. At most one exists.
#[derive(Debug, Clone)]
pub struct Operator {
    pub id: Uuid,
    pub username: String,
    pub secret_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Operator bootstrap payload
#[derive(Debug, Clone)]
pub struct NewOperator {
    pub username: String,
    pub secret_hash: String,
}
