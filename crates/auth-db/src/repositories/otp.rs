//! PostgreSQL implementation of OtpRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use auth_core::{OtpRecord, OtpRepository, RepoResult};

use crate::models::OtpModel;

use super::error::map_db_error;

/// PostgreSQL implementation of OtpRepository
#[derive(Clone)]
pub struct PgOtpRepository {
    pool: PgPool,
}

impl PgOtpRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OtpRepository for PgOtpRepository {
    #[instrument(skip(self, record), fields(email = %record.email))]
    async fn create(&self, record: &OtpRecord) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO otps (email, token_hash, expires_at, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(&record.email)
        .bind(&record.token_hash)
        .bind(record.expires_at)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, token_hash))]
    async fn find(&self, email: &str, token_hash: &str) -> RepoResult<Option<OtpRecord>> {
        let result = sqlx::query_as::<_, OtpModel>(
            r"
            SELECT id, email, token_hash, expires_at, created_at
            FROM otps
            WHERE email = $1 AND token_hash = $2
            ORDER BY created_at DESC
            LIMIT 1
            ",
        )
        .bind(email)
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(OtpRecord::from))
    }

    #[instrument(skip(self, token_hash))]
    async fn delete(&self, email: &str, token_hash: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM otps WHERE email = $1 AND token_hash = $2")
            .bind(email)
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete_all_for_email(&self, email: &str) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM otps WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM otps WHERE expires_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
