//! Application state
//!
//! Holds the shared state for the Axum application: the service context,
//! the configuration and handles to the backends the readiness probe checks.

use std::sync::Arc;

use auth_cache::RedisPool;
use auth_common::AppConfig;
use auth_db::PgPool;
use auth_service::{ServiceContext, TokenLifecycleEngine};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Service context containing all dependencies
    service_context: Arc<ServiceContext>,
    /// Application configuration
    config: Arc<AppConfig>,
    /// Set when users and OTPs live in PostgreSQL
    pg_pool: Option<PgPool>,
    /// Set when refresh tokens live in Redis
    redis_pool: Option<RedisPool>,
}

impl AppState {
    /// Create a new AppState backed by in-process storage
    pub fn new(service_context: ServiceContext, config: AppConfig) -> Self {
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            pg_pool: None,
            redis_pool: None,
        }
    }

    pub fn with_pg_pool(mut self, pool: PgPool) -> Self {
        self.pg_pool = Some(pool);
        self
    }

    pub fn with_redis_pool(mut self, pool: RedisPool) -> Self {
        self.redis_pool = Some(pool);
        self
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the token lifecycle engine from the service context
    pub fn tokens(&self) -> &TokenLifecycleEngine {
        self.service_context.tokens()
    }

    pub fn pg_pool(&self) -> Option<&PgPool> {
        self.pg_pool.as_ref()
    }

    pub fn redis_pool(&self) -> Option<&RedisPool> {
        self.redis_pool.as_ref()
    }

    /// Whether cookies carry the `Secure` attribute
    pub fn secure_cookies(&self) -> bool {
        self.config.cookies.secure
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("config", &"AppConfig")
            .field("pg_pool", &self.pg_pool.is_some())
            .field("redis_pool", &self.redis_pool.is_some())
            .finish()
    }
}
