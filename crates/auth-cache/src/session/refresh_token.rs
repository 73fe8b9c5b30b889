//! Refresh token storage in Redis
//!
//! Each record lives under `refresh_token:<id>` as JSON. Keys outlive the
//! record's own expiry by a retention window so that a late redemption still
//! finds the record and reports it as expired rather than missing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::instrument;

use auth_core::{DomainError, RefreshTokenRecord, RefreshTokenRepository, RepoResult};

use crate::pool::RedisPool;

/// Redis key prefix for refresh tokens
const REFRESH_TOKEN_PREFIX: &str = "refresh_token:";

/// How long an expired record stays readable before Redis drops it
const RETENTION_SECONDS: i64 = 3600;

/// Refresh token repository backed by Redis
#[derive(Debug, Clone)]
pub struct RedisRefreshTokenRepository {
    pool: RedisPool,
}

impl RedisRefreshTokenRepository {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Generate Redis key for a refresh token
    fn key(id: &str) -> String {
        format!("{REFRESH_TOKEN_PREFIX}{id}")
    }

    /// Key lifetime: what is left of the record plus the retention window
    fn key_ttl(record: &RefreshTokenRecord, now: DateTime<Utc>) -> u64 {
        let remaining = (record.expires_at - now).num_seconds().max(0);
        u64::try_from(remaining + RETENTION_SECONDS).unwrap_or(1).max(1)
    }
}

#[async_trait]
impl RefreshTokenRepository for RedisRefreshTokenRepository {
    #[instrument(skip(self, record), fields(scope = %record.scope()))]
    async fn insert(&self, record: &RefreshTokenRecord) -> RepoResult<()> {
        let ttl = Self::key_ttl(record, Utc::now());
        let stored = self.pool.set_new(&Self::key(&record.id), record, ttl).await?;

        if !stored {
            return Err(DomainError::DuplicateTokenId);
        }

        tracing::debug!(ttl_seconds = ttl, "Refresh token stored");
        Ok(())
    }

    #[instrument(skip(self, id))]
    async fn find(&self, id: &str) -> RepoResult<Option<RefreshTokenRecord>> {
        Ok(self.pool.get_value(&Self::key(id)).await?)
    }

    #[instrument(skip(self, id))]
    async fn delete(&self, id: &str) -> RepoResult<bool> {
        Ok(self.pool.delete(&Self::key(id)).await?)
    }

    async fn purge_expired(&self, _cutoff: DateTime<Utc>) -> RepoResult<u64> {
        // Keys carry their own TTL
        Ok(0)
    }
}
