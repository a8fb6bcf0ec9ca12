//! Session-related types.
//!
//! Types stored in the session for authentication state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use client_manager_core::UserId;

/// Session-stored identity of the logged-in user.
///
/// Serialized once by the session layer; never re-parsed from a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    /// User's database ID.
    pub user_id: UserId,
    /// When the login that established this identity happened.
    pub issued_at: DateTime<Utc>,
}

impl SessionIdentity {
    /// Identity for a login happening now.
    #[must_use]
    pub fn issue(user_id: UserId) -> Self {
        Self {
            user_id,
            issued_at: Utc::now(),
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the authenticated user's identity.
    pub const AUTHENTICATED_USER: &str = "authenticated_user";
}
