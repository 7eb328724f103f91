//! Customer model and related payloads

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::Role;

/// Customer entity
///
/// Deliberately not `Serialize`: the password hash must never reach a
/// response body. Use [`CustomerProfile`] for output.
#[derive(Debug, Clone)]
pub struct Customer {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New customer creation payload
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Customer update payload
#[derive(Debug, Clone, Default)]
pub struct UpdateCustomer {
    pub username: Option<String>,
    pub password_hash: Option<String>,
}

impl UpdateCustomer {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password_hash.is_none()
    }
}

/// Customer as returned by `/auth/me`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Customer> for CustomerProfile {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            username: customer.username.clone(),
            email: customer.email.clone(),
            role: Role::Customer,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        }
    }
}

/// Short form returned next to a freshly issued token
#[derive(Debug, Clone, Serialize)]
pub struct CustomerSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<&Customer> for CustomerSummary {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            username: customer.username.clone(),
            email: customer.email.clone(),
            role: Role::Customer,
        }
    }
}
