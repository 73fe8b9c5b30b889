//! # auth-common
//!
//! Shared utilities including configuration, error handling, token signing,
//! password and OTP hashing, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    generate_otp_code, generate_otp_code_with, hash_password, validate_password_strength,
    verify_password, OtpHasher, PasswordService, SignedClaims, TokenCodec, TokenError,
    OTP_LENGTH,
};
pub use config::{
    AppConfig, AppSettings, ConfigError, CookieConfig, CorsConfig, DatabaseConfig, Environment,
    JwtConfig, MailBackend, MailConfig, OtpConfig, RateLimitConfig, RedisConfig,
    RefreshTokenBackend, ServerConfig, StorageBackend, StorageConfig, TokenTtlConfig,
};
pub use error::{AppError, AppResult};
pub use telemetry::{try_init_tracing_with_config, TracingConfig, TracingError};
