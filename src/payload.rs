/// Token Payload
///
/// The identity and validity window carried inside every token,
/// whichever backend produced it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TokenError;

/// Identity plus validity window. Immutable once created.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Unique token id, used downstream to correlate a token with a session
    pub id: Uuid,
    /// Subject the token asserts
    pub username: String,
    /// Creation time
    pub issued_at: DateTime<Utc>,
    /// `issued_at + duration`
    pub expired_at: DateTime<Utc>,
}

impl Payload {
    /// Create a payload for `username` valid for `duration` from now.
    ///
    /// A negative duration yields a payload that is already expired.
    pub fn new(username: &str, duration: Duration) -> Self {
        let issued_at = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            issued_at,
            expired_at: issued_at + duration,
        }
    }

    /// Check the validity window.
    ///
    /// Only call this on a payload recovered from an authenticated token.
    ///
    /// # Errors
    /// Returns `TokenError::Expired` once the current time is past `expired_at`
    pub fn valid(&self) -> Result<(), TokenError> {
        if self.is_expired() {
            return Err(TokenError::Expired);
        }
        Ok(())
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expired_at
    }
}
