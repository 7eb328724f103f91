//! Customer repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use super::CustomerStore;
use crate::models::{Customer, NewCustomer, UpdateCustomer};

/// Customer repository
#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    /// Create a new customer repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn customer_from_row(row: &PgRow) -> Customer {
    Customer {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl CustomerStore for CustomerRepository {
    async fn create(&self, new_customer: NewCustomer) -> DatabaseResult<Customer> {
        info!("Creating new customer: {}", new_customer.username);

        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO customers (id, username, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, username, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_customer.username)
        .bind(&new_customer.email)
        .bind(&new_customer.password_hash)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(customer_from_row(&row))
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<Customer>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM customers
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.as_ref().map(customer_from_row))
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Customer>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.as_ref().map(customer_from_row))
    }

    async fn update(&self, id: Uuid, changes: UpdateCustomer) -> DatabaseResult<Customer> {
        info!("Updating customer: {}", id);

        let row = sqlx::query(
            r#"
            UPDATE customers
            SET username = COALESCE($2, username),
                password_hash = COALESCE($3, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.username)
        .bind(changes.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        row.as_ref()
            .map(customer_from_row)
            .ok_or(DatabaseError::NotFound)
    }
}
