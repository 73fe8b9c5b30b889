//! # auth-db
//!
//! Storage layer implementing the repository traits from `auth-core`.
//!
//! ## Overview
//!
//! - PostgreSQL connection pool and schema setup
//! - Database models with SQLx `FromRow` derives and entity mappers
//! - PostgreSQL repositories for users, OTPs and refresh tokens
//! - In-memory repositories with the same semantics, used by the `memory`
//!   storage backend and by tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use auth_db::{create_pool, run_migrations, PgRefreshTokenRepository};
//!
//! async fn example(config: &auth_common::DatabaseConfig) -> Result<(), sqlx::Error> {
//!     let pool = create_pool(config).await?;
//!     run_migrations(&pool).await?;
//!     let refresh_tokens = PgRefreshTokenRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::{MemoryOtpRepository, MemoryRefreshTokenRepository, MemoryUserRepository};
pub use pool::{create_pool, ping, run_migrations, PgPool};
pub use repositories::{PgOtpRepository, PgRefreshTokenRepository, PgUserRepository};
