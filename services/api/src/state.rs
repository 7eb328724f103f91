//! Application state shared across handlers

use std::sync::Arc;

use auth::{AuthConfig, AuthState};
use sqlx::PgPool;

use crate::{
    orders::OrderManager,
    repositories::{
        ContactRepository, ContactStore, MemoryContactStore, MemoryOrderStore, MemoryReviewStore,
        MemoryServiceStore, OrderRepository, ReviewRepository, ReviewStore, ServiceRepository,
        ServiceStore,
    },
    uploads::UploadStore,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub orders: OrderManager,
    pub services: Arc<dyn ServiceStore>,
    pub reviews: Arc<dyn ReviewStore>,
    pub contacts: Arc<dyn ContactStore>,
    /// Present when running against PostgreSQL; used by the health check
    pub db_pool: Option<PgPool>,
}

impl AppState {
    /// State backed by PostgreSQL. `auth` must already use the same pool.
    pub fn postgres(auth: AuthState, pool: PgPool, uploads: UploadStore) -> Self {
        let services: Arc<dyn ServiceStore> = Arc::new(ServiceRepository::new(pool.clone()));
        let orders = OrderManager::new(
            Arc::new(OrderRepository::new(pool.clone())),
            services.clone(),
            uploads,
        );

        Self {
            auth,
            orders,
            services,
            reviews: Arc::new(ReviewRepository::new(pool.clone())),
            contacts: Arc::new(ContactRepository::new(pool.clone())),
            db_pool: Some(pool),
        }
    }

    /// State backed by in-process stores
    pub fn in_memory(auth_config: AuthConfig, uploads: UploadStore) -> Self {
        Self::with_auth(AuthState::in_memory(auth_config), uploads)
    }

    /// In-process stores around an existing auth state
    pub fn with_auth(auth: AuthState, uploads: UploadStore) -> Self {
        let services: Arc<dyn ServiceStore> = Arc::new(MemoryServiceStore::new());
        let orders = OrderManager::new(
            Arc::new(MemoryOrderStore::new(auth.customers.clone())),
            services.clone(),
            uploads,
        );

        Self {
            auth,
            orders,
            services,
            reviews: Arc::new(MemoryReviewStore::new()),
            contacts: Arc::new(MemoryContactStore::new()),
            db_pool: None,
        }
    }
}
