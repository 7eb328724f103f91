//! Common library for the agency backend
//!
//! Shared infrastructure used by the auth and api services: PostgreSQL
//! connectivity, the Redis client, and storage error types.

pub mod cache;
pub mod database;
pub mod error;
