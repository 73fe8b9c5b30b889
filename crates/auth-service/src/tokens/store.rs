//! Refresh token store
//!
//! Mints opaque refresh token ids and persists their records through a
//! [`RefreshTokenRepository`]. There is no update operation: a record is
//! created once and later deleted exactly once.

use std::sync::Arc;

use auth_core::{
    AccessClaims, DomainError, RefreshTokenRecord, RefreshTokenRepository, RefreshTtl,
};
use chrono::{Duration, Utc};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::services::ServiceResult;

/// Expired records stay redeemable (as "expired") this long before purging
pub const PURGE_GRACE_SECONDS: i64 = 3600;

/// Fresh ids to try before giving up on a colliding insert
const MAX_ID_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct RefreshTokenStore {
    repo: Arc<dyn RefreshTokenRepository>,
}

impl RefreshTokenStore {
    pub fn new(repo: Arc<dyn RefreshTokenRepository>) -> Self {
        Self { repo }
    }

    /// 32 lowercase hex characters from a v4 UUID
    fn mint_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// Persist a record for `claims` and return its id, which is the refresh token
    #[instrument(skip(self, claims), fields(scope = %claims.scope()))]
    pub async fn create(&self, claims: &AccessClaims, ttl: RefreshTtl) -> ServiceResult<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let record = RefreshTokenRecord::new(Self::mint_id(), claims.clone(), ttl)?;
            match self.repo.insert(&record).await {
                Ok(()) => {
                    debug!(expires_at = %record.expires_at, "Refresh token created");
                    return Ok(record.id);
                }
                Err(DomainError::DuplicateTokenId) => {
                    warn!("Refresh token id collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(DomainError::DuplicateTokenId.into())
    }

    pub async fn find(&self, id: &str) -> ServiceResult<Option<RefreshTokenRecord>> {
        Ok(self.repo.find(id).await?)
    }

    /// `true` only for the caller that actually removed the record
    pub async fn delete(&self, id: &str) -> ServiceResult<bool> {
        Ok(self.repo.delete(id).await?)
    }

    /// Drop records that expired more than the grace period ago
    pub async fn purge_expired(&self) -> ServiceResult<u64> {
        let cutoff = Utc::now() - Duration::seconds(PURGE_GRACE_SECONDS);
        Ok(self.repo.purge_expired(cutoff).await?)
    }
}

impl std::fmt::Debug for RefreshTokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshTokenStore").finish_non_exhaustive()
    }
}
