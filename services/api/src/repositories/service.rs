//! Service catalog repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow, types::Json};
use tracing::info;
use uuid::Uuid;

use super::ServiceStore;
use crate::models::{NewService, Service, SubService};

/// Service catalog repository
#[derive(Clone)]
pub struct ServiceRepository {
    pool: PgPool,
}

impl ServiceRepository {
    /// Create a new service repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn service_from_row(row: &PgRow) -> Service {
    let Json(sub_services): Json<Vec<SubService>> = row.get("sub_services");

    Service {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        icon: row.get("icon"),
        gradient: row.get("gradient"),
        sub_services,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl ServiceStore for ServiceRepository {
    async fn list(&self) -> DatabaseResult<Vec<Service>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, icon, gradient, sub_services, created_at, updated_at
            FROM services
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(rows.iter().map(service_from_row).collect())
    }

    async fn find_by_title(&self, title: &str) -> DatabaseResult<Option<Service>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, description, icon, gradient, sub_services, created_at, updated_at
            FROM services
            WHERE title = $1
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.as_ref().map(service_from_row))
    }

    async fn create(&self, service: NewService) -> DatabaseResult<Service> {
        info!("Creating service: {}", service.title);

        let row = sqlx::query(
            r#"
            INSERT INTO services (id, title, description, icon, gradient, sub_services,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING id, title, description, icon, gradient, sub_services, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&service.title)
        .bind(&service.description)
        .bind(&service.icon)
        .bind(&service.gradient)
        .bind(Json(&service.sub_services))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(service_from_row(&row))
    }

    async fn update(&self, id: Uuid, service: NewService) -> DatabaseResult<Option<Service>> {
        let row = sqlx::query(
            r#"
            UPDATE services
            SET title = $2, description = $3, icon = $4, gradient = $5, sub_services = $6,
                updated_at = $7
            WHERE id = $1
            RETURNING id, title, description, icon, gradient, sub_services, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&service.title)
        .bind(&service.description)
        .bind(&service.icon)
        .bind(&service.gradient)
        .bind(Json(&service.sub_services))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(row.as_ref().map(service_from_row))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }
}
