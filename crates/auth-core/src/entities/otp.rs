//! One-time passcode record

use chrono::{DateTime, Duration, Utc};

/// A pending one-time passcode. Only the keyed hash of the code is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpRecord {
    pub email: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl OtpRecord {
    pub fn new(email: String, token_hash: String, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            email,
            token_hash,
            expires_at: now + ttl,
            created_at: now,
        }
    }

    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
