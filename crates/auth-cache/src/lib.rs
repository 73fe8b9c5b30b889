//! # auth-cache
//!
//! Redis layer for refresh token storage.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Refresh Tokens**: `RefreshTokenRepository` backed by Redis keys that
//!   expire on their own
//!
//! ## Example
//!
//! ```ignore
//! use auth_cache::{RedisPool, RedisRefreshTokenRepository};
//!
//! let pool = RedisPool::from_config(&config.redis)?;
//! let refresh_tokens = RedisRefreshTokenRepository::new(pool);
//! ```

pub mod pool;
pub mod session;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolError, RedisResult};

// Re-export session types
pub use session::RedisRefreshTokenRepository;
