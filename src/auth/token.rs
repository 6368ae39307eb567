use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bearer token payload as persisted by a [`TokenStore`](super::TokenStore).
///
/// The token itself is opaque; expiry is signaled by the backend rejecting it
/// with a 401, not by any field here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredToken {
    pub token: String,
    pub saved_at: DateTime<Utc>,
}

impl StoredToken {
    /// Wrap a freshly issued token, stamped now.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            saved_at: Utc::now(),
        }
    }
}
