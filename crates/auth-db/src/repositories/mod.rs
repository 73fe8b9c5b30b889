//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in auth-core.

mod error;
mod otp;
mod refresh_token;
mod user;

pub use otp::PgOtpRepository;
pub use refresh_token::PgRefreshTokenRepository;
pub use user::PgUserRepository;
