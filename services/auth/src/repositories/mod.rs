//! Credential storage
//!
//! Two async traits describe what the auth service needs from storage.
//! [`CustomerRepository`] and [`OperatorRepository`] implement them on
//! PostgreSQL; the `memory` module provides in-process equivalents.

use async_trait::async_trait;
use common::error::DatabaseResult;
use uuid::Uuid;

use crate::models::{Customer, NewCustomer, NewOperator, Operator, UpdateCustomer};

pub mod customer;
pub mod memory;
pub mod operator;

pub use customer::CustomerRepository;
pub use memory::{MemoryCustomerStore, MemoryOperatorStore};
pub use operator::OperatorRepository;

/// Customer persistence
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Insert a customer. Fails with `DatabaseError::Conflict` when the
    /// email is already registered.
    async fn create(&self, new_customer: NewCustomer) -> DatabaseResult<Customer>;

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<Customer>>;

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Customer>>;

    /// Apply the provided fields. Fails with `DatabaseError::NotFound`.
    async fn update(&self, id: Uuid, changes: UpdateCustomer) -> DatabaseResult<Customer>;
}

/// Operator persistence
#[async_trait]
pub trait OperatorStore: Send + Sync {
    async fn count(&self) -> DatabaseResult<i64>;

    /// Insert the operator. Fails with `DatabaseError::Conflict` once one
    /// exists.
    async fn create(&self, new_operator: NewOperator) -> DatabaseResult<Operator>;

    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<Operator>>;

    /// Replace the secret hash. Fails with `DatabaseError::NotFound`.
    async fn reset_secret(&self, username: &str, secret_hash: &str) -> DatabaseResult<()>;
}
