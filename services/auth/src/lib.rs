//! Authentication and authorization for the agency backend
//!
//! Issues and verifies session tokens for the two principal kinds
//! (customers and the single operator), stores their credentials, and
//! provides the gateway middleware other services put in front of their
//! protected routes.

pub mod config;
pub mod error;
pub mod extract;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod policy;
pub mod rate_limiter;
pub mod repositories;
pub mod revocation;
pub mod routes;
pub mod state;
pub mod validation;

pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use middleware::guarded;
pub use models::{Principal, Role};
pub use policy::Operation;
pub use state::AuthState;
