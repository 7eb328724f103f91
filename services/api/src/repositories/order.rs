//! Order repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use super::OrderStore;
use crate::models::{CustomerRef, NewOrder, Order, OrderStatus, OrderWithCustomer};

const ORDER_COLUMNS: &str = "o.id, o.customer_id, o.service_title, o.sub_service_title, \
     o.unit_price, o.country, o.target_url, o.quantity, o.amount, o.comments, o.utr_number, \
     o.payment_screenshot, o.status, o.created_at, o.updated_at";

/// Order repository
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Create a new order repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn order_from_row(row: &PgRow) -> DatabaseResult<Order> {
    let status: String = row.get("status");
    let status = status
        .parse::<OrderStatus>()
        .map_err(|e| DatabaseError::Query(sqlx::Error::Decode(Box::new(e))))?;

    Ok(Order {
        id: row.get("id"),
        customer_id: row.get("customer_id"),
        service_title: row.get("service_title"),
        sub_service_title: row.get("sub_service_title"),
        unit_price: row.get("unit_price"),
        country: row.get("country"),
        target_url: row.get("target_url"),
        quantity: row.get("quantity"),
        amount: row.get("amount"),
        comments: row.get("comments"),
        utr_number: row.get("utr_number"),
        payment_screenshot: row.get("payment_screenshot"),
        status,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn insert(&self, new_order: NewOrder) -> DatabaseResult<Order> {
        let now = Utc::now();
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO orders AS o (id, customer_id, service_title, sub_service_title, unit_price,
                                     country, target_url, quantity, amount, comments, utr_number,
                                     payment_screenshot, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $14)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(new_order.customer_id)
        .bind(&new_order.service_title)
        .bind(&new_order.sub_service_title)
        .bind(new_order.unit_price)
        .bind(&new_order.country)
        .bind(&new_order.target_url)
        .bind(new_order.quantity)
        .bind(new_order.amount)
        .bind(&new_order.comments)
        .bind(&new_order.utr_number)
        .bind(&new_order.payment_screenshot)
        .bind(OrderStatus::Pending.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        let order = order_from_row(&row)?;
        info!("Inserted order {} for customer {}", order.id, order.customer_id);
        Ok(order)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Order>> {
        let row = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders o WHERE o.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        row.as_ref().map(order_from_row).transpose()
    }

    async fn list_for_customer(&self, customer_id: Uuid) -> DatabaseResult<Vec<Order>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders o
            WHERE o.customer_id = $1
            ORDER BY o.created_at DESC
            "#
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        rows.iter().map(order_from_row).collect()
    }

    async fn list_all(&self) -> DatabaseResult<Vec<OrderWithCustomer>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {ORDER_COLUMNS},
                   c.id AS owner_id, c.username AS owner_username, c.email AS owner_email
            FROM orders o
            LEFT JOIN customers c ON c.id = o.customer_id
            ORDER BY o.created_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        rows.iter()
            .map(|row| {
                let order = order_from_row(row)?;
                let owner_id: Option<Uuid> = row.get("owner_id");
                let user = owner_id.map(|id| CustomerRef {
                    id,
                    username: row.get("owner_username"),
                    email: row.get("owner_email"),
                });
                Ok(OrderWithCustomer { order, user })
            })
            .collect()
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> DatabaseResult<Option<Order>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE orders AS o
            SET status = $3, updated_at = $4
            WHERE o.id = $1 AND o.status = $2
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        row.as_ref().map(order_from_row).transpose()
    }
}
