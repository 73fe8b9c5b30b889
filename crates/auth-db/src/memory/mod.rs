//! In-memory repositories
//!
//! Same contracts as the PostgreSQL repositories, backed by process-local
//! maps. Used by the `memory` storage backend and throughout the test suites.

mod otp;
mod refresh_token;
mod user;

pub use otp::MemoryOtpRepository;
pub use refresh_token::MemoryRefreshTokenRepository;
pub use user::MemoryUserRepository;
