//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present). Loaded once at startup and shared read-only afterwards.

use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub storage: StorageConfig,
    pub database: Option<DatabaseConfig>,
    pub redis: Option<RedisConfig>,
    pub jwt: JwtConfig,
    pub tokens: TokenTtlConfig,
    pub otp: OtpConfig,
    pub cookies: CookieConfig,
    pub mail: MailConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where users, OTPs and (by default) refresh tokens live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Postgres,
    /// Process-local maps; state is lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown storage backend '{other}'")),
        }
    }
}

/// Where refresh token records live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshTokenBackend {
    /// Same backend as the rest of the storage
    #[default]
    Database,
    Redis,
}

impl FromStr for RefreshTokenBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "database" | "db" => Ok(Self::Database),
            "redis" => Ok(Self::Redis),
            other => Err(format!("unknown refresh token backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub refresh_tokens: RefreshTokenBackend,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Access token signing configuration
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Token lifetimes per scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenTtlConfig {
    pub app_access_seconds: i64,
    pub app_refresh_days: i64,
    pub otp_access_seconds: i64,
    pub otp_refresh_seconds: i64,
    pub password_access_seconds: i64,
    pub password_refresh_seconds: i64,
}

impl Default for TokenTtlConfig {
    fn default() -> Self {
        Self {
            app_access_seconds: 300,
            app_refresh_days: 7,
            otp_access_seconds: 300,
            otp_refresh_seconds: 3600,
            password_access_seconds: 300,
            password_refresh_seconds: 3600,
        }
    }
}

/// One-time passcode settings
#[derive(Clone)]
pub struct OtpConfig {
    pub secret: String,
    pub ttl_seconds: i64,
    /// Send unverified users through the OTP flow before granting app access
    pub require_email_verification: bool,
}

impl std::fmt::Debug for OtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpConfig")
            .field("secret", &"<redacted>")
            .field("ttl_seconds", &self.ttl_seconds)
            .field("require_email_verification", &self.require_email_verification)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CookieConfig {
    pub secure: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MailBackend {
    /// Write outgoing mail to the log only
    #[default]
    Log,
    /// POST outgoing mail to an HTTP relay
    Http,
}

impl FromStr for MailBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "log" => Ok(Self::Log),
            "http" => Ok(Self::Http),
            other => Err(format!("unknown mail backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub backend: MailBackend,
    pub from: String,
    pub relay_url: Option<String>,
    pub api_key: Option<String>,
}

/// Longest lifetime accepted for any token or passcode
pub const MAX_TTL_SECONDS: i64 = 365 * 86_400;

/// The limiter replenishes in whole milliseconds
pub const MAX_REQUESTS_PER_SECOND: u32 = 1000;

/// Rate limiting configuration
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "auth-server".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_otp_ttl() -> i64 {
    3600
}

fn default_mail_from() -> String {
    "no-reply@localhost".to_string()
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

/// Parse an optional variable, falling back to `default` when unset
fn parse_var<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(name, e.to_string())),
        None => Ok(default),
    }
}

fn require_var<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an explicit set of variables
    ///
    /// # Errors
    /// Returns an error if required variables are missing or invalid
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|name| vars.get(name).cloned())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = StorageConfig {
            backend: parse_var(&lookup, "STORAGE_BACKEND", StorageBackend::default())?,
            refresh_tokens: parse_var(
                &lookup,
                "REFRESH_TOKEN_BACKEND",
                RefreshTokenBackend::default(),
            )?,
        };

        let database = match (storage.backend, lookup("DATABASE_URL")) {
            (_, Some(url)) if !url.is_empty() => Some(DatabaseConfig {
                url,
                max_connections: parse_var(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    default_max_connections(),
                )?,
                min_connections: parse_var(
                    &lookup,
                    "DATABASE_MIN_CONNECTIONS",
                    default_min_connections(),
                )?,
            }),
            (StorageBackend::Postgres, _) => return Err(ConfigError::MissingVar("DATABASE_URL")),
            (StorageBackend::Memory, _) => None,
        };

        let redis = match (storage.refresh_tokens, lookup("REDIS_URL")) {
            (_, Some(url)) if !url.is_empty() => Some(RedisConfig {
                url,
                max_connections: parse_var(
                    &lookup,
                    "REDIS_MAX_CONNECTIONS",
                    default_redis_max_connections(),
                )?,
            }),
            (RefreshTokenBackend::Redis, _) => return Err(ConfigError::MissingVar("REDIS_URL")),
            (RefreshTokenBackend::Database, _) => None,
        };

        let jwt_secret = require_var(&lookup, "JWT_SECRET")?;
        let defaults = TokenTtlConfig::default();

        let config = Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: parse_var(&lookup, "APP_ENV", Environment::default())?,
            },
            api: ServerConfig {
                host: lookup("API_HOST").unwrap_or_else(default_host),
                port: parse_var(&lookup, "API_PORT", default_port())?,
            },
            storage,
            database,
            redis,
            tokens: TokenTtlConfig {
                app_access_seconds: parse_var(
                    &lookup,
                    "APP_ACCESS_TOKEN_TTL",
                    defaults.app_access_seconds,
                )?,
                app_refresh_days: parse_var(
                    &lookup,
                    "APP_REFRESH_TOKEN_TTL_DAYS",
                    defaults.app_refresh_days,
                )?,
                otp_access_seconds: parse_var(
                    &lookup,
                    "OTP_ACCESS_TOKEN_TTL",
                    defaults.otp_access_seconds,
                )?,
                otp_refresh_seconds: parse_var(
                    &lookup,
                    "OTP_REFRESH_TOKEN_TTL",
                    defaults.otp_refresh_seconds,
                )?,
                password_access_seconds: parse_var(
                    &lookup,
                    "PASSWORD_ACCESS_TOKEN_TTL",
                    defaults.password_access_seconds,
                )?,
                password_refresh_seconds: parse_var(
                    &lookup,
                    "PASSWORD_REFRESH_TOKEN_TTL",
                    defaults.password_refresh_seconds,
                )?,
            },
            otp: OtpConfig {
                secret: lookup("OTP_SECRET")
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| jwt_secret.clone()),
                ttl_seconds: parse_var(&lookup, "OTP_TTL_SECONDS", default_otp_ttl())?,
                require_email_verification: parse_var(
                    &lookup,
                    "REQUIRE_EMAIL_VERIFICATION",
                    false,
                )?,
            },
            jwt: JwtConfig { secret: jwt_secret },
            cookies: CookieConfig {
                secure: parse_var(&lookup, "COOKIE_SECURE", false)?,
            },
            mail: MailConfig {
                backend: parse_var(&lookup, "MAIL_BACKEND", MailBackend::default())?,
                from: lookup("MAIL_FROM").unwrap_or_else(default_mail_from),
                relay_url: lookup("MAIL_RELAY_URL").filter(|v| !v.is_empty()),
                api_key: lookup("MAIL_API_KEY").filter(|v| !v.is_empty()),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parse_var(
                    &lookup,
                    "RATE_LIMIT_REQUESTS_PER_SECOND",
                    default_requests_per_second(),
                )?,
                burst: parse_var(&lookup, "RATE_LIMIT_BURST", default_burst())?,
            },
            cors: CorsConfig {
                allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mail.backend == MailBackend::Http && self.mail.relay_url.is_none() {
            return Err(ConfigError::MissingVar("MAIL_RELAY_URL"));
        }

        let tokens = &self.tokens;
        let ttls = [
            ("APP_ACCESS_TOKEN_TTL", tokens.app_access_seconds, MAX_TTL_SECONDS),
            ("APP_REFRESH_TOKEN_TTL_DAYS", tokens.app_refresh_days, MAX_TTL_SECONDS / 86_400),
            ("OTP_ACCESS_TOKEN_TTL", tokens.otp_access_seconds, MAX_TTL_SECONDS),
            ("OTP_REFRESH_TOKEN_TTL", tokens.otp_refresh_seconds, MAX_TTL_SECONDS),
            ("PASSWORD_ACCESS_TOKEN_TTL", tokens.password_access_seconds, MAX_TTL_SECONDS),
            ("PASSWORD_REFRESH_TOKEN_TTL", tokens.password_refresh_seconds, MAX_TTL_SECONDS),
            ("OTP_TTL_SECONDS", self.otp.ttl_seconds, MAX_TTL_SECONDS),
        ];
        for (name, value, max) in ttls {
            if !(1..=max).contains(&value) {
                return Err(ConfigError::InvalidValue(
                    name,
                    format!("{value} is outside 1..={max}"),
                ));
            }
        }

        let rps = self.rate_limit.requests_per_second;
        if !(1..=MAX_REQUESTS_PER_SECOND).contains(&rps) {
            return Err(ConfigError::InvalidValue(
                "RATE_LIMIT_REQUESTS_PER_SECOND",
                format!("{rps} is outside 1..={MAX_REQUESTS_PER_SECOND}"),
            ));
        }
        if self.rate_limit.burst == 0 {
            return Err(ConfigError::InvalidValue(
                "RATE_LIMIT_BURST",
                "must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_memory_backend_needs_only_secret() {
        let config = AppConfig::from_vars(&vars(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert!(config.database.is_none());
        assert!(config.redis.is_none());
        assert_eq!(config.tokens, TokenTtlConfig::default());
        assert_eq!(config.otp.secret, "secret");
        assert!(!config.otp.require_email_verification);
        assert_eq!(config.api.address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_missing_jwt_secret() {
        let err = AppConfig::from_vars(&vars(&[("STORAGE_BACKEND", "memory")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("JWT_SECRET")));
    }

    #[test]
    fn test_postgres_requires_database_url() {
        let err = AppConfig::from_vars(&vars(&[("JWT_SECRET", "secret")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("DATABASE_URL")));
    }

    #[test]
    fn test_redis_refresh_tokens_require_redis_url() {
        let err = AppConfig::from_vars(&vars(&[
            ("STORAGE_BACKEND", "memory"),
            ("REFRESH_TOKEN_BACKEND", "redis"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("REDIS_URL")));
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let err = AppConfig::from_vars(&vars(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", "secret"),
            ("API_PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("API_PORT", _)));
    }

    #[test]
    fn test_http_mailer_requires_relay() {
        let err = AppConfig::from_vars(&vars(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", "secret"),
            ("MAIL_BACKEND", "http"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("MAIL_RELAY_URL")));
    }

    #[test]
    fn test_ttls_must_be_positive() {
        for name in ["APP_ACCESS_TOKEN_TTL", "APP_REFRESH_TOKEN_TTL_DAYS", "OTP_TTL_SECONDS"] {
            for value in ["0", "-30"] {
                let err = AppConfig::from_vars(&vars(&[
                    ("STORAGE_BACKEND", "memory"),
                    ("JWT_SECRET", "secret"),
                    (name, value),
                ]))
                .unwrap_err();
                assert!(matches!(err, ConfigError::InvalidValue(n, _) if n == name));
            }
        }
    }

    #[test]
    fn test_ttls_are_bounded() {
        let err = AppConfig::from_vars(&vars(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", "secret"),
            ("APP_REFRESH_TOKEN_TTL_DAYS", "9223372036854775807"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("APP_REFRESH_TOKEN_TTL_DAYS", _)));

        let err = AppConfig::from_vars(&vars(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", "secret"),
            ("PASSWORD_REFRESH_TOKEN_TTL", &(MAX_TTL_SECONDS + 1).to_string()),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("PASSWORD_REFRESH_TOKEN_TTL", _)));

        let config = AppConfig::from_vars(&vars(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", "secret"),
            ("APP_REFRESH_TOKEN_TTL_DAYS", "365"),
            ("OTP_ACCESS_TOKEN_TTL", &MAX_TTL_SECONDS.to_string()),
        ]))
        .unwrap();
        assert_eq!(config.tokens.app_refresh_days, 365);
    }

    #[test]
    fn test_rate_limit_bounds() {
        let err = AppConfig::from_vars(&vars(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", "secret"),
            ("RATE_LIMIT_REQUESTS_PER_SECOND", "1001"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("RATE_LIMIT_REQUESTS_PER_SECOND", _)));

        let err = AppConfig::from_vars(&vars(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", "secret"),
            ("RATE_LIMIT_BURST", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("RATE_LIMIT_BURST", _)));

        let config = AppConfig::from_vars(&vars(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", "secret"),
            ("RATE_LIMIT_REQUESTS_PER_SECOND", "1000"),
        ]))
        .unwrap();
        assert_eq!(config.rate_limit.requests_per_second, MAX_REQUESTS_PER_SECOND);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_vars(&vars(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", "secret"),
            ("OTP_SECRET", "otp-secret"),
            ("APP_ENV", "production"),
            ("OTP_REFRESH_TOKEN_TTL", "600"),
            ("REQUIRE_EMAIL_VERIFICATION", "true"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test"),
        ]))
        .unwrap();

        assert!(config.app.env.is_production());
        assert_eq!(config.otp.secret, "otp-secret");
        assert_eq!(config.tokens.otp_refresh_seconds, 600);
        assert!(config.otp.require_email_verification);
        assert_eq!(
            config.cors.allowed_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn test_jwt_secret_is_redacted_in_debug() {
        let config = JwtConfig {
            secret: "super-secret".to_string(),
        };
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
