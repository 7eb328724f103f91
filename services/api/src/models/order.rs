//! Order models and the status lifecycle

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Order status
///
/// `Pending` is initial. `Done` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::Done,
        OrderStatus::Cancelled,
    ];

    /// Wire and storage representation
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::InProgress => "In Progress",
            OrderStatus::Done => "Done",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// The transition table
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;

        matches!(
            (self, next),
            (Pending, InProgress)
                | (Pending, Done)
                | (InProgress, Done)
                | (Pending, Cancelled)
                | (InProgress, Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub service_title: String,
    pub sub_service_title: String,
    /// Package price at the time the order was placed
    pub unit_price: f64,
    pub country: String,
    pub target_url: String,
    pub quantity: i32,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub utr_number: String,
    /// Stored path relative to the server root, e.g. `uploads/<file>`
    pub payment_screenshot: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated order ready for insertion
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: Uuid,
    pub service_title: String,
    pub sub_service_title: String,
    pub unit_price: f64,
    pub country: String,
    pub target_url: String,
    pub quantity: i32,
    pub amount: f64,
    pub comments: Option<String>,
    pub utr_number: String,
    pub payment_screenshot: String,
}

/// Owning customer as shown to the operator
#[derive(Debug, Clone, Serialize)]
pub struct CustomerRef {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// Order row for the operator listing
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithCustomer {
    #[serde(flatten)]
    pub order: Order,
    pub user: Option<CustomerRef>,
}

/// Body of `PUT /orders/:id/status`
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names() {
        assert_eq!("In Progress".parse::<OrderStatus>().unwrap(), OrderStatus::InProgress);
        assert_eq!("Done".parse::<OrderStatus>().unwrap(), OrderStatus::Done);
        assert!("done".parse::<OrderStatus>().is_err());
        assert!("InProgress".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn serializes_in_progress_with_a_space() {
        let json = serde_json::to_string(&OrderStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for from in [OrderStatus::Done, OrderStatus::Cancelled] {
            for to in OrderStatus::ALL {
                assert!(!from.can_transition_to(to), "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn transition_table() {
        use OrderStatus::*;

        assert!(Pending.can_transition_to(InProgress));
        assert!(Pending.can_transition_to(Done));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(InProgress.can_transition_to(Done));
        assert!(InProgress.can_transition_to(Cancelled));

        assert!(!InProgress.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!InProgress.can_transition_to(InProgress));
    }
}
