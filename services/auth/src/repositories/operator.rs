//! Operator repository for database operations
//!
//! The `operators` table carries a `singleton` column that is always TRUE
//! and unique, so a second insert fails at the database regardless of
//! concurrent bootstrap requests.

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use super::OperatorStore;
use crate::models::{NewOperator, Operator};

/// Operator repository
#[derive(Clone)]
pub struct OperatorRepository {
    pool: PgPool,
}

impl OperatorRepository {
    /// Create a new operator repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn operator_from_row(row: &PgRow) -> Operator {
    Operator {
        id: row.get("id"),
        username: row.get("username"),
        secret_hash: row.get("secret_hash"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl OperatorStore for OperatorRepository {
    async fn count(&self) -> DatabaseResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM operators")
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn create(&self, new_operator: NewOperator) -> DatabaseResult<Operator> {
        info!("Creating operator: {}", new_operator.username);

        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO operators (id, username, secret_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, username, secret_hash, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_operator.username)
        .bind(&new_operator.secret_hash)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(operator_from_row(&row))
    }

    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<Operator>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, secret_hash, created_at, updated_at
            FROM operators
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.as_ref().map(operator_from_row))
    }

    async fn reset_secret(&self, username: &str, secret_hash: &str) -> DatabaseResult<()> {
        info!("Resetting secret for operator: {}", username);

        let result = sqlx::query(
            r#"
            UPDATE operators
            SET secret_hash = $2, updated_at = NOW()
            WHERE username = $1
            "#,
        )
        .bind(username)
        .bind(secret_hash)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }
}
