//! Bearer token claims.
//!
//! Tokens are minted by the sign-in service that shares the signing secret.
//! This service reads the subject and the role and nothing else.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User the token was issued to.
    pub sub: Uuid,
    /// Role name: `admin`, `staff` or `borrower`.
    pub role: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

impl Claims {
    /// Claims for `user_id` issued at `issued_at` and valid for `ttl`.
    #[must_use]
    pub fn new(user_id: Uuid, role: &str, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: user_id,
            role: role.to_owned(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    /// The subject as a user ID.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Expiry as a timestamp, `None` if `exp` is out of range.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}
