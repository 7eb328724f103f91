//! The authenticated caller attached to a request by the gateway

use uuid::Uuid;

use super::Role;

/// Resolved identity of a verified session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Customer or operator id
    pub id: Uuid,
    pub role: Role,
    /// Present for operator tokens only
    pub username: Option<String>,
    /// Token id, used for revocation
    pub token_id: Uuid,
    /// Expiry as seconds since the Unix epoch
    pub expires_at: u64,
}
