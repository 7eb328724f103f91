//! Contact message repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use super::ContactStore;
use crate::models::{ContactMessage, NewContactMessage};

#[derive(Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn message_from_row(row: &PgRow) -> ContactMessage {
    ContactMessage {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        details: row.get("details"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl ContactStore for ContactRepository {
    async fn create(&self, message: NewContactMessage) -> DatabaseResult<ContactMessage> {
        let row = sqlx::query(
            r#"
            INSERT INTO contact_messages (id, name, email, phone, details, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, email, phone, details, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.phone)
        .bind(&message.details)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(message_from_row(&row))
    }

    async fn list(&self) -> DatabaseResult<Vec<ContactMessage>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, phone, details, created_at
            FROM contact_messages
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(rows.iter().map(message_from_row).collect())
    }
}
