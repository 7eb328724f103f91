//! In-process stores
//!
//! Used by tests and by the `memory` storage mode. Records are kept in
//! insertion order so "newest first" is a reverse scan.

use std::sync::Arc;

use async_trait::async_trait;
use auth::repositories::CustomerStore;
use chrono::Utc;
use common::error::DatabaseResult;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ContactStore, OrderStore, ReviewStore, ServiceStore};
use crate::models::{
    ContactMessage, CustomerRef, NewContactMessage, NewOrder, NewReview, NewService, Order,
    OrderStatus, OrderWithCustomer, Review, Service,
};

/// Orders kept in memory. Owner summaries come from the customer store.
#[derive(Clone)]
pub struct MemoryOrderStore {
    orders: Arc<RwLock<Vec<Order>>>,
    customers: Arc<dyn CustomerStore>,
}

impl MemoryOrderStore {
    pub fn new(customers: Arc<dyn CustomerStore>) -> Self {
        Self {
            orders: Arc::new(RwLock::new(Vec::new())),
            customers,
        }
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn insert(&self, new_order: NewOrder) -> DatabaseResult<Order> {
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            customer_id: new_order.customer_id,
            service_title: new_order.service_title,
            sub_service_title: new_order.sub_service_title,
            unit_price: new_order.unit_price,
            country: new_order.country,
            target_url: new_order.target_url,
            quantity: new_order.quantity,
            amount: new_order.amount,
            comments: new_order.comments,
            utr_number: new_order.utr_number,
            payment_screenshot: new_order.payment_screenshot,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        self.orders.write().await.push(order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.iter().find(|o| o.id == id).cloned())
    }

    async fn list_for_customer(&self, customer_id: Uuid) -> DatabaseResult<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(orders
            .iter()
            .rev()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> DatabaseResult<Vec<OrderWithCustomer>> {
        let orders: Vec<Order> = self.orders.read().await.iter().rev().cloned().collect();

        let mut listed = Vec::with_capacity(orders.len());
        for order in orders {
            let user = self
                .customers
                .find_by_id(order.customer_id)
                .await?
                .map(|customer| CustomerRef {
                    id: customer.id,
                    username: customer.username,
                    email: customer.email,
                });
            listed.push(OrderWithCustomer { order, user });
        }
        Ok(listed)
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> DatabaseResult<Option<Order>> {
        let mut orders = self.orders.write().await;
        Ok(orders
            .iter_mut()
            .find(|o| o.id == id && o.status == from)
            .map(|order| {
                order.status = to;
                order.updated_at = Utc::now();
                order.clone()
            }))
    }
}

#[derive(Clone, Default)]
pub struct MemoryServiceStore {
    services: Arc<RwLock<Vec<Service>>>,
}

impl MemoryServiceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ServiceStore for MemoryServiceStore {
    async fn list(&self) -> DatabaseResult<Vec<Service>> {
        Ok(self.services.read().await.clone())
    }

    async fn find_by_title(&self, title: &str) -> DatabaseResult<Option<Service>> {
        let services = self.services.read().await;
        Ok(services.iter().find(|s| s.title == title).cloned())
    }

    async fn create(&self, service: NewService) -> DatabaseResult<Service> {
        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4(),
            title: service.title,
            description: service.description,
            icon: service.icon,
            gradient: service.gradient,
            sub_services: service.sub_services,
            created_at: now,
            updated_at: now,
        };

        self.services.write().await.push(service.clone());
        Ok(service)
    }

    async fn update(&self, id: Uuid, service: NewService) -> DatabaseResult<Option<Service>> {
        let mut services = self.services.write().await;
        Ok(services.iter_mut().find(|s| s.id == id).map(|existing| {
            existing.title = service.title;
            existing.description = service.description;
            existing.icon = service.icon;
            existing.gradient = service.gradient;
            existing.sub_services = service.sub_services;
            existing.updated_at = Utc::now();
            existing.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut services = self.services.write().await;
        let before = services.len();
        services.retain(|s| s.id != id);
        Ok(services.len() < before)
    }
}

#[derive(Clone, Default)]
pub struct MemoryReviewStore {
    reviews: Arc<RwLock<Vec<Review>>>,
}

impl MemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn list(&self, approved_only: bool) -> DatabaseResult<Vec<Review>> {
        let reviews = self.reviews.read().await;
        Ok(reviews
            .iter()
            .rev()
            .filter(|r| r.is_approved || !approved_only)
            .cloned()
            .collect())
    }

    async fn create(&self, review: NewReview) -> DatabaseResult<Review> {
        let now = Utc::now();
        let review = Review {
            id: Uuid::new_v4(),
            name: review.name,
            role: review.role,
            rating: review.rating,
            message: review.message,
            is_approved: false,
            created_at: now,
            updated_at: now,
        };

        self.reviews.write().await.push(review.clone());
        Ok(review)
    }

    async fn set_approved(&self, id: Uuid, approved: bool) -> DatabaseResult<Option<Review>> {
        let mut reviews = self.reviews.write().await;
        Ok(reviews.iter_mut().find(|r| r.id == id).map(|review| {
            review.is_approved = approved;
            review.updated_at = Utc::now();
            review.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut reviews = self.reviews.write().await;
        let before = reviews.len();
        reviews.retain(|r| r.id != id);
        Ok(reviews.len() < before)
    }
}

#[derive(Clone, Default)]
pub struct MemoryContactStore {
    messages: Arc<RwLock<Vec<ContactMessage>>>,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn create(&self, message: NewContactMessage) -> DatabaseResult<ContactMessage> {
        let message = ContactMessage {
            id: Uuid::new_v4(),
            name: message.name,
            email: message.email,
            phone: message.phone,
            details: message.details,
            created_at: Utc::now(),
        };

        self.messages.write().await.push(message.clone());
        Ok(message)
    }

    async fn list(&self) -> DatabaseResult<Vec<ContactMessage>> {
        Ok(self.messages.read().await.iter().rev().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::repositories::MemoryCustomerStore;

    fn new_order(customer_id: Uuid, title: &str) -> NewOrder {
        NewOrder {
            customer_id,
            service_title: "Instagram".to_string(),
            sub_service_title: title.to_string(),
            unit_price: 100.0,
            country: "India".to_string(),
            target_url: "https://instagram.com/alice".to_string(),
            quantity: 1,
            amount: 100.0,
            comments: None,
            utr_number: "UTR1".to_string(),
            payment_screenshot: "uploads/a.png".to_string(),
        }
    }

    #[tokio::test]
    async fn customer_listing_is_scoped_and_newest_first() {
        let store = MemoryOrderStore::new(Arc::new(MemoryCustomerStore::new()));
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.insert(new_order(alice, "first")).await.unwrap();
        store.insert(new_order(bob, "other")).await.unwrap();
        store.insert(new_order(alice, "second")).await.unwrap();

        let listed = store.list_for_customer(alice).await.unwrap();
        let titles: Vec<_> = listed.iter().map(|o| o.sub_service_title.as_str()).collect();
        assert_eq!(titles, ["second", "first"]);
        assert_eq!(store.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn status_update_is_compare_and_set() {
        let store = MemoryOrderStore::new(Arc::new(MemoryCustomerStore::new()));
        let order = store.insert(new_order(Uuid::new_v4(), "x")).await.unwrap();

        let updated = store
            .update_status(order.id, OrderStatus::Pending, OrderStatus::InProgress)
            .await
            .unwrap();
        assert_eq!(updated.unwrap().status, OrderStatus::InProgress);

        // A second writer that still believes the order is Pending loses
        let stale = store
            .update_status(order.id, OrderStatus::Pending, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert!(stale.is_none());

        let current = store.find_by_id(order.id).await.unwrap().unwrap();
        assert_eq!(current.status, OrderStatus::InProgress);
    }

    #[tokio::test]
    async fn unapproved_reviews_are_hidden_from_public_listing() {
        let store = MemoryReviewStore::new();
        let review = store
            .create(NewReview {
                name: "Priya".to_string(),
                role: "Client".to_string(),
                rating: 5,
                message: "Great".to_string(),
            })
            .await
            .unwrap();

        assert!(store.list(true).await.unwrap().is_empty());
        assert_eq!(store.list(false).await.unwrap().len(), 1);

        store.set_approved(review.id, true).await.unwrap();
        assert_eq!(store.list(true).await.unwrap().len(), 1);

        assert!(store.delete(review.id).await.unwrap());
        assert!(!store.delete(review.id).await.unwrap());
    }
}
