//! Storage for orders, the catalog, reviews, and contact messages
//!
//! Each concern is an async trait with a PostgreSQL implementation and an
//! in-process one in [`memory`].

use async_trait::async_trait;
use common::error::DatabaseResult;
use uuid::Uuid;

use crate::models::{
    ContactMessage, NewContactMessage, NewOrder, NewReview, NewService, Order, OrderStatus,
    OrderWithCustomer, Review, Service,
};

pub mod contact;
pub mod memory;
pub mod order;
pub mod review;
pub mod service;

pub use contact::ContactRepository;
pub use memory::{MemoryContactStore, MemoryOrderStore, MemoryReviewStore, MemoryServiceStore};
pub use order::OrderRepository;
pub use review::ReviewRepository;
pub use service::ServiceRepository;

/// Order persistence
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert(&self, new_order: NewOrder) -> DatabaseResult<Order>;

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Order>>;

    /// Orders owned by `customer_id`, newest first
    async fn list_for_customer(&self, customer_id: Uuid) -> DatabaseResult<Vec<Order>>;

    /// Every order with its owner, newest first
    async fn list_all(&self) -> DatabaseResult<Vec<OrderWithCustomer>>;

    /// Set the status only if it is still `from`. Returns `None` when the
    /// order is missing or its status has moved on.
    async fn update_status(
        &self,
        id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> DatabaseResult<Option<Order>>;
}

/// Service catalog persistence
#[async_trait]
pub trait ServiceStore: Send + Sync {
    /// All services, oldest first
    async fn list(&self) -> DatabaseResult<Vec<Service>>;

    async fn find_by_title(&self, title: &str) -> DatabaseResult<Option<Service>>;

    async fn create(&self, service: NewService) -> DatabaseResult<Service>;

    async fn update(&self, id: Uuid, service: NewService) -> DatabaseResult<Option<Service>>;

    /// Returns whether a service was removed
    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;
}

/// Review persistence
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Newest first, optionally only approved ones
    async fn list(&self, approved_only: bool) -> DatabaseResult<Vec<Review>>;

    async fn create(&self, review: NewReview) -> DatabaseResult<Review>;

    async fn set_approved(&self, id: Uuid, approved: bool) -> DatabaseResult<Option<Review>>;

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;
}

/// Contact message persistence
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn create(&self, message: NewContactMessage) -> DatabaseResult<ContactMessage>;

    /// Newest first
    async fn list(&self) -> DatabaseResult<Vec<ContactMessage>>;
}
