//! deadpool-redis pool with the handful of commands the refresh token store needs.

use auth_common::RedisConfig;
use auth_core::DomainError;
use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum RedisPoolError {
    #[error("Failed to create Redis pool: {0}")]
    CreatePool(String),

    #[error("Failed to get connection from pool: {0}")]
    GetConnection(#[from] deadpool_redis::PoolError),

    #[error("Redis command error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<RedisPoolError> for DomainError {
    fn from(err: RedisPoolError) -> Self {
        DomainError::CacheError(err.to_string())
    }
}

pub type RedisResult<T> = Result<T, RedisPoolError>;

/// Host part of a Redis URL, without credentials
fn redacted(url: &str) -> &str {
    url.rsplit('@').next().unwrap_or(url)
}

/// Cloneable handle to a pool of Redis connections
#[derive(Clone)]
pub struct RedisPool {
    pool: Pool,
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.pool.status();
        f.debug_struct("RedisPool")
            .field("size", &status.size)
            .field("available", &status.available)
            .finish()
    }
}

impl RedisPool {
    pub fn new(url: &str, max_connections: usize) -> RedisResult<Self> {
        let pool = Config::from_url(url)
            .builder()
            .map_err(|e| RedisPoolError::CreatePool(e.to_string()))?
            .max_size(max_connections)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| RedisPoolError::CreatePool(e.to_string()))?;

        tracing::info!(url = %redacted(url), max_connections, "Redis pool created");
        Ok(Self { pool })
    }

    pub fn from_config(config: &RedisConfig) -> RedisResult<Self> {
        Self::new(&config.url, config.max_connections as usize)
    }

    async fn connection(&self) -> RedisResult<deadpool_redis::Connection> {
        Ok(self.pool.get().await?)
    }

    /// `PING` round trip, used by startup and the readiness probe
    pub async fn health_check(&self) -> RedisResult<()> {
        let mut conn = self.connection().await?;
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(())
    }

    /// `SET key json NX EX ttl`; `false` when the key already existed
    pub async fn set_new<V: Serialize>(
        &self,
        key: &str,
        value: &V,
        ttl_seconds: u64,
    ) -> RedisResult<bool> {
        let payload = serde_json::to_string(value)?;
        let mut conn = self.connection().await?;

        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(payload)
            .arg("NX")
            .arg("EX")
            .arg(ttl_seconds)
            .query_async(&mut conn)
            .await?;

        Ok(reply.is_some())
    }

    pub async fn get_value<V: DeserializeOwned>(&self, key: &str) -> RedisResult<Option<V>> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.get(key).await?;
        raw.map(|v| serde_json::from_str(&v))
            .transpose()
            .map_err(Into::into)
    }

    /// `DEL` is atomic, so of two racing callers only one sees `true`
    pub async fn delete(&self, key: &str) -> RedisResult<bool> {
        let mut conn = self.connection().await?;
        let removed: u32 = conn.del(key).await?;
        Ok(removed > 0)
    }
}
