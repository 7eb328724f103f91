//! Review repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use super::ReviewStore;
use crate::models::{NewReview, Review};

/// Review repository
#[derive(Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    /// Create a new review repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn review_from_row(row: &PgRow) -> Review {
    Review {
        id: row.get("id"),
        name: row.get("name"),
        role: row.get("role"),
        rating: row.get("rating"),
        message: row.get("message"),
        is_approved: row.get("is_approved"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl ReviewStore for ReviewRepository {
    async fn list(&self, approved_only: bool) -> DatabaseResult<Vec<Review>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, role, rating, message, is_approved, created_at, updated_at
            FROM reviews
            WHERE is_approved OR NOT $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(approved_only)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(rows.iter().map(review_from_row).collect())
    }

    async fn create(&self, review: NewReview) -> DatabaseResult<Review> {
        let row = sqlx::query(
            r#"
            INSERT INTO reviews
                (id, name, role, rating, message, is_approved, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, FALSE, $6, $6)
            RETURNING id, name, role, rating, message, is_approved, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&review.name)
        .bind(&review.role)
        .bind(review.rating)
        .bind(&review.message)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(review_from_row(&row))
    }

    async fn set_approved(&self, id: Uuid, approved: bool) -> DatabaseResult<Option<Review>> {
        let row = sqlx::query(
            r#"
            UPDATE reviews
            SET is_approved = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, name, role, rating, message, is_approved, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(approved)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.as_ref().map(review_from_row))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }
}
