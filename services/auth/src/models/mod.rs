//! Authentication service models

pub mod customer;
pub mod operator;
pub mod principal;
pub mod role;

// Re-export for convenience
pub use customer::{Customer, CustomerProfile, CustomerSummary, NewCustomer, UpdateCustomer};
pub use operator::{NewOperator, Operator};
pub use principal::Principal;
pub use role::Role;
