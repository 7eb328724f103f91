//! Storefront API: orders, catalog, reviews, and contact messages
//!
//! Builds on the `auth` crate for accounts, tokens, and the gateway that
//! guards every protected route.

pub mod config;
pub mod error;
pub mod models;
pub mod orders;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod uploads;

pub use routes::create_router;
pub use state::AppState;
