//! Authorization policy
//!
//! Every protected operation is named here together with the role it
//! requires. The gateway looks the requirement up when a route is guarded,
//! so handlers never check roles themselves.

use tracing::warn;

use crate::{
    error::AuthError,
    models::{Principal, Role},
};

/// Protected operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ReadProfile,
    UpdateProfile,
    CustomerLogout,
    CreateOrder,
    ListOwnOrders,
    ListAllOrders,
    SetOrderStatus,
    CreateService,
    UpdateService,
    DeleteService,
    ListAllReviews,
    ModerateReview,
    DeleteReview,
    ListContactMessages,
    OperatorLogout,
}

impl Operation {
    pub const ALL: [Operation; 15] = [
        Operation::ReadProfile,
        Operation::UpdateProfile,
        Operation::CustomerLogout,
        Operation::CreateOrder,
        Operation::ListOwnOrders,
        Operation::ListAllOrders,
        Operation::SetOrderStatus,
        Operation::CreateService,
        Operation::UpdateService,
        Operation::DeleteService,
        Operation::ListAllReviews,
        Operation::ModerateReview,
        Operation::DeleteReview,
        Operation::ListContactMessages,
        Operation::OperatorLogout,
    ];

    /// The policy table
    pub fn required_role(self) -> Role {
        match self {
            Operation::ReadProfile
            | Operation::UpdateProfile
            | Operation::CustomerLogout
            | Operation::CreateOrder
            | Operation::ListOwnOrders => Role::Customer,

            Operation::ListAllOrders
            | Operation::SetOrderStatus
            | Operation::CreateService
            | Operation::UpdateService
            | Operation::DeleteService
            | Operation::ListAllReviews
            | Operation::ModerateReview
            | Operation::DeleteReview
            | Operation::ListContactMessages
            | Operation::OperatorLogout => Role::Operator,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::ReadProfile => "read_profile",
            Operation::UpdateProfile => "update_profile",
            Operation::CustomerLogout => "customer_logout",
            Operation::CreateOrder => "create_order",
            Operation::ListOwnOrders => "list_own_orders",
            Operation::ListAllOrders => "list_all_orders",
            Operation::SetOrderStatus => "set_order_status",
            Operation::CreateService => "create_service",
            Operation::UpdateService => "update_service",
            Operation::DeleteService => "delete_service",
            Operation::ListAllReviews => "list_all_reviews",
            Operation::ModerateReview => "moderate_review",
            Operation::DeleteReview => "delete_review",
            Operation::ListContactMessages => "list_contact_messages",
            Operation::OperatorLogout => "operator_logout",
        }
    }

    /// Check `principal` against the table
    pub fn authorize(self, principal: &Principal) -> Result<(), AuthError> {
        if principal.role == self.required_role() {
            return Ok(());
        }

        warn!(
            "Access denied: {} {} attempted {}",
            principal.role,
            principal.id,
            self.name()
        );
        Err(AuthError::Forbidden)
    }
}
