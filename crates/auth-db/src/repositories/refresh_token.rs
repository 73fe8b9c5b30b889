//! PostgreSQL implementation of RefreshTokenRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::instrument;

use auth_core::{DomainError, RefreshTokenRecord, RefreshTokenRepository, RepoResult};

use crate::models::RefreshTokenModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of RefreshTokenRepository
#[derive(Clone)]
pub struct PgRefreshTokenRepository {
    pool: PgPool,
}

impl PgRefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenRepository for PgRefreshTokenRepository {
    #[instrument(skip(self, record))]
    async fn insert(&self, record: &RefreshTokenRecord) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO refresh_tokens (id, claims, expires_at, valid_days, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(&record.id)
        .bind(Json(&record.claims))
        .bind(record.expires_at)
        .bind(record.valid_days)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, |_| DomainError::DuplicateTokenId))?;

        Ok(())
    }

    #[instrument(skip(self, id))]
    async fn find(&self, id: &str) -> RepoResult<Option<RefreshTokenRecord>> {
        let result = sqlx::query_as::<_, RefreshTokenModel>(
            r"
            SELECT id, claims, expires_at, valid_days, created_at
            FROM refresh_tokens
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(RefreshTokenRecord::from))
    }

    #[instrument(skip(self, id))]
    async fn delete(&self, id: &str) -> RepoResult<bool> {
        // Row-level locking makes this exactly-once: a concurrent DELETE of the
        // same id waits, then affects zero rows.
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
