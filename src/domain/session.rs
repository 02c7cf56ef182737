//! Session entity used in authentication.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A time-bounded proof of authentication for one user.
///
/// The session id equals the owning user's id, so there is at most one
/// session per user: creating a session replaces any prior one for that id.
/// Expiry is never enforced eagerly; stores check it lazily on access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Session {
    /// Id of the owning user
    pub id: u32,
    /// User name the session was issued for
    pub user_name: String,
    /// Creation instant in unix milliseconds
    pub created_at: i64,
}

impl Session {
    pub fn new(id: u32, user_name: impl Into<String>, created_at: i64) -> Self {
        Self {
            id,
            user_name: user_name.into(),
            created_at,
        }
    }
}
