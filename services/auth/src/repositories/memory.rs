//! In-process credential stores
//!
//! Used by tests and by the `memory` storage mode. They honour the same
//! uniqueness rules as the PostgreSQL schema.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CustomerStore, OperatorStore};
use crate::models::{Customer, NewCustomer, NewOperator, Operator, UpdateCustomer};

#[derive(Clone, Default)]
pub struct MemoryCustomerStore {
    customers: Arc<RwLock<Vec<Customer>>>,
}

impl MemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.customers.read().await.len()
    }
}

#[async_trait]
impl CustomerStore for MemoryCustomerStore {
    async fn create(&self, new_customer: NewCustomer) -> DatabaseResult<Customer> {
        let mut customers = self.customers.write().await;
        if customers.iter().any(|c| c.email == new_customer.email) {
            return Err(DatabaseError::Conflict("customers_email_key".to_string()));
        }

        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4(),
            username: new_customer.username,
            email: new_customer.email,
            password_hash: new_customer.password_hash,
            created_at: now,
            updated_at: now,
        };
        customers.push(customer.clone());
        Ok(customer)
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<Customer>> {
        let customers = self.customers.read().await;
        Ok(customers.iter().find(|c| c.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Customer>> {
        let customers = self.customers.read().await;
        Ok(customers.iter().find(|c| c.id == id).cloned())
    }

    async fn update(&self, id: Uuid, changes: UpdateCustomer) -> DatabaseResult<Customer> {
        let mut customers = self.customers.write().await;
        let customer = customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(DatabaseError::NotFound)?;

        if let Some(username) = changes.username {
            customer.username = username;
        }
        if let Some(password_hash) = changes.password_hash {
            customer.password_hash = password_hash;
        }
        customer.updated_at = Utc::now();
        Ok(customer.clone())
    }
}

#[derive(Clone, Default)]
pub struct MemoryOperatorStore {
    operator: Arc<RwLock<Option<Operator>>>,
}

impl MemoryOperatorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OperatorStore for MemoryOperatorStore {
    async fn count(&self) -> DatabaseResult<i64> {
        Ok(i64::from(self.operator.read().await.is_some()))
    }

    async fn create(&self, new_operator: NewOperator) -> DatabaseResult<Operator> {
        let mut slot = self.operator.write().await;
        if slot.is_some() {
            return Err(DatabaseError::Conflict("operators_singleton_key".to_string()));
        }

        let now = Utc::now();
        let operator = Operator {
            id: Uuid::new_v4(),
            username: new_operator.username,
            secret_hash: new_operator.secret_hash,
            created_at: now,
            updated_at: now,
        };
        *slot = Some(operator.clone());
        Ok(operator)
    }

    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<Operator>> {
        let slot = self.operator.read().await;
        Ok(slot.as_ref().filter(|o| o.username == username).cloned())
    }

    async fn reset_secret(&self, username: &str, secret_hash: &str) -> DatabaseResult<()> {
        let mut slot = self.operator.write().await;
        match slot.as_mut().filter(|o| o.username == username) {
            Some(operator) => {
                operator.secret_hash = secret_hash.to_string();
                operator.updated_at = Utc::now();
                Ok(())
            }
            None => Err(DatabaseError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_customer(email: &str) -> NewCustomer {
        NewCustomer {
            username: "alice".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_creates_nothing() {
        let store = MemoryCustomerStore::new();
        store.create(new_customer("a@example.com")).await.unwrap();

        let err = store.create(new_customer("a@example.com")).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn update_changes_only_given_fields() {
        let store = MemoryCustomerStore::new();
        let created = store.create(new_customer("a@example.com")).await.unwrap();

        let updated = store
            .update(
                created.id,
                UpdateCustomer {
                    username: Some("alicia".to_string()),
                    password_hash: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.username, "alicia");
        assert_eq!(updated.password_hash, created.password_hash);
        assert!(matches!(
            store.update(Uuid::new_v4(), UpdateCustomer::default()).await,
            Err(DatabaseError::NotFound)
        ));
    }

    #[tokio::test]
    async fn operator_creation_locks_after_first() {
        let store = MemoryOperatorStore::new();
        assert_eq!(store.count().await.unwrap(), 0);

        store
            .create(NewOperator {
                username: "root".to_string(),
                secret_hash: "h1".to_string(),
            })
            .await
            .unwrap();

        let err = store
            .create(NewOperator {
                username: "other".to_string(),
                secret_hash: "h2".to_string(),
            })
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn reset_secret_requires_known_username() {
        let store = MemoryOperatorStore::new();
        store
            .create(NewOperator {
                username: "root".to_string(),
                secret_hash: "h1".to_string(),
            })
            .await
            .unwrap();

        store.reset_secret("root", "h2").await.unwrap();
        let operator = store.find_by_username("root").await.unwrap().unwrap();
        assert_eq!(operator.secret_hash, "h2");

        assert!(matches!(
            store.reset_secret("nobody", "h3").await,
            Err(DatabaseError::NotFound)
        ));
    }
}
