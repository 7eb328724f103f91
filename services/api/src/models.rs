//! API models for request and response payloads

pub mod contact;
pub mod order;
pub mod review;
pub mod service;

pub use contact::{ContactMessage, ContactSubmission, NewContactMessage};
pub use order::{
    CustomerRef, NewOrder, Order, OrderStatus, OrderWithCustomer, StatusUpdate, UnknownStatus,
};
pub use review::{NewReview, Review, ReviewApproval, ReviewSubmission};
pub use service::{NewService, Service, ServiceDefinition, SubService};
