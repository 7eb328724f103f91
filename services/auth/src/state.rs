//! State shared by the auth handlers and the gateway

use std::sync::Arc;

use crate::{
    config::AuthConfig,
    jwt::TokenService,
    rate_limiter::RateLimiter,
    repositories::{CustomerStore, MemoryCustomerStore, MemoryOperatorStore, OperatorStore},
    revocation::{MemoryRevocationStore, RevocationStore},
};

/// Authentication state
#[derive(Clone)]
pub struct AuthState {
    pub config: Arc<AuthConfig>,
    pub tokens: TokenService,
    pub customers: Arc<dyn CustomerStore>,
    pub operators: Arc<dyn OperatorStore>,
    pub revocations: Arc<dyn RevocationStore>,
    pub rate_limiter: RateLimiter,
}

impl AuthState {
    pub fn new(
        config: AuthConfig,
        customers: Arc<dyn CustomerStore>,
        operators: Arc<dyn OperatorStore>,
        revocations: Arc<dyn RevocationStore>,
    ) -> Self {
        let tokens = TokenService::new(config.jwt.clone());
        let rate_limiter = RateLimiter::new(config.rate_limit.clone());

        Self {
            config: Arc::new(config),
            tokens,
            customers,
            operators,
            revocations,
            rate_limiter,
        }
    }

    /// State backed entirely by in-process stores
    pub fn in_memory(config: AuthConfig) -> Self {
        Self::new(
            config,
            Arc::new(MemoryCustomerStore::new()),
            Arc::new(MemoryOperatorStore::new()),
            Arc::new(MemoryRevocationStore::new()),
        )
    }
}
