//! Refresh token record
//!
//! The record id is the refresh token itself. Records are never updated: a
//! redemption deletes the record and, when it succeeds, creates a successor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{AccessClaims, RefreshTtl, TokenScope};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    pub id: String,
    /// Exactly the claims embedded in the paired access token
    pub claims: AccessClaims,
    pub expires_at: DateTime<Utc>,
    /// Informational only
    pub valid_days: f64,
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    pub fn new(id: String, claims: AccessClaims, ttl: RefreshTtl) -> Result<Self, DomainError> {
        Self::issued_at(id, claims, ttl, Utc::now())
    }

    /// Fails when `now + ttl` falls outside the representable date range
    pub fn issued_at(
        id: String,
        claims: AccessClaims,
        ttl: RefreshTtl,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let expires_at = ttl
            .try_duration()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                DomainError::InternalError(format!("refresh token ttl {ttl:?} overflows"))
            })?;

        Ok(Self {
            id,
            claims,
            expires_at,
            valid_days: ttl.valid_days(),
            created_at: now,
        })
    }

    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub const fn scope(&self) -> TokenScope {
        self.claims.scope()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::UserId;
    use chrono::Duration;

    fn claims() -> AccessClaims {
        AccessClaims::AppAccess {
            user_id: UserId::new(),
            username: "jane.doe".to_string(),
        }
    }

    #[test]
    fn test_default_ttl() {
        let now = Utc::now();
        let record = RefreshTokenRecord::issued_at("abc".into(), claims(), RefreshTtl::default(), now)
                .unwrap();
        assert_eq!(record.expires_at, now + Duration::days(7));
        assert!((record.valid_days - 7.0).abs() < f64::EPSILON);
        assert_eq!(record.scope(), TokenScope::App);
    }

    #[test]
    fn test_second_based_ttl() {
        let now = Utc::now();
        let record =
            RefreshTokenRecord::issued_at("abc".into(), claims(), RefreshTtl::Seconds(3600), now)
                .unwrap();
        assert_eq!(record.expires_at, now + Duration::hours(1));
        assert!(record.is_expired_at(now + Duration::hours(1)));
        assert!(!record.is_expired_at(now));
    }

    #[test]
    fn test_json_roundtrip_keeps_claims() {
        let record = RefreshTokenRecord::new("abc".into(), claims(), RefreshTtl::default()).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let back: RefreshTokenRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.claims, record.claims);
        assert_eq!(back.expires_at, record.expires_at);
    }

    #[test]
    fn test_oversized_ttl_is_rejected() {
        for ttl in [RefreshTtl::Days(i64::MAX / 86_400), RefreshTtl::Seconds(i64::MAX)] {
            let result = RefreshTokenRecord::new("abc".into(), claims(), ttl);
            assert!(matches!(result, Err(DomainError::InternalError(_))));
        }
    }
}
