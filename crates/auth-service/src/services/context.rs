//! Service context - dependency container for services
//!
//! Holds the repositories, the token lifecycle engine, the mailer and the
//! settings every service needs.

use std::sync::Arc;

use auth_common::{AppConfig, OtpHasher, PasswordService, TokenCodec};
use auth_core::{OtpRepository, RefreshTokenRepository, UserRepository};

use crate::mail::{LogMailer, Mailer};
use crate::tokens::{RefreshTokenStore, TokenLifecycleEngine, TokenPolicy};

use super::error::{ServiceError, ServiceResult};

/// Tunables read from configuration
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub otp_ttl_seconds: i64,
    /// Route unverified users through the OTP flow on signup and login
    pub require_email_verification: bool,
    pub mail_from: String,
}

impl ServiceSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            otp_ttl_seconds: config.otp.ttl_seconds,
            require_email_verification: config.otp.require_email_verification,
            mail_from: config.mail.from.clone(),
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            otp_ttl_seconds: 3600,
            require_email_verification: false,
            mail_from: "no-reply@localhost".to_string(),
        }
    }
}

/// Service context containing all dependencies
///
/// Cheap to clone; everything inside is shared.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    otp_repo: Arc<dyn OtpRepository>,

    // Token lifecycle
    tokens: Arc<TokenLifecycleEngine>,

    // Helpers
    otp_hasher: OtpHasher,
    passwords: PasswordService,
    mailer: Arc<dyn Mailer>,

    settings: ServiceSettings,
}

impl ServiceContext {
    // === Repositories ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the OTP repository
    pub fn otp_repo(&self) -> &dyn OtpRepository {
        self.otp_repo.as_ref()
    }

    // === Token lifecycle ===

    pub fn tokens(&self) -> &TokenLifecycleEngine {
        self.tokens.as_ref()
    }

    // === Helpers ===

    pub fn otp_hasher(&self) -> &OtpHasher {
        &self.otp_hasher
    }

    pub fn passwords(&self) -> &PasswordService {
        &self.passwords
    }

    pub fn mailer(&self) -> &dyn Mailer {
        self.mailer.as_ref()
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("tokens", &self.tokens)
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    otp_repo: Option<Arc<dyn OtpRepository>>,
    refresh_token_repo: Option<Arc<dyn RefreshTokenRepository>>,
    codec: Option<TokenCodec>,
    token_policy: Option<TokenPolicy>,
    otp_hasher: Option<OtpHasher>,
    mailer: Option<Arc<dyn Mailer>>,
    settings: Option<ServiceSettings>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn otp_repo(mut self, repo: Arc<dyn OtpRepository>) -> Self {
        self.otp_repo = Some(repo);
        self
    }

    pub fn refresh_token_repo(mut self, repo: Arc<dyn RefreshTokenRepository>) -> Self {
        self.refresh_token_repo = Some(repo);
        self
    }

    pub fn codec(mut self, codec: TokenCodec) -> Self {
        self.codec = Some(codec);
        self
    }

    pub fn token_policy(mut self, policy: TokenPolicy) -> Self {
        self.token_policy = Some(policy);
        self
    }

    pub fn otp_hasher(mut self, hasher: OtpHasher) -> Self {
        self.otp_hasher = Some(hasher);
        self
    }

    pub fn mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub fn settings(mut self, settings: ServiceSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Build the ServiceContext
    ///
    /// Policy, settings and mailer fall back to their defaults.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let refresh_token_repo = self
            .refresh_token_repo
            .ok_or_else(|| ServiceError::validation("refresh_token_repo is required"))?;
        let codec = self
            .codec
            .ok_or_else(|| ServiceError::validation("codec is required"))?;

        let tokens = TokenLifecycleEngine::new(
            codec,
            RefreshTokenStore::new(refresh_token_repo),
            self.token_policy.unwrap_or_default(),
        );

        Ok(ServiceContext {
            user_repo: self
                .user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            otp_repo: self
                .otp_repo
                .ok_or_else(|| ServiceError::validation("otp_repo is required"))?,
            tokens: Arc::new(tokens),
            otp_hasher: self
                .otp_hasher
                .ok_or_else(|| ServiceError::validation("otp_hasher is required"))?,
            passwords: PasswordService::new(),
            mailer: self.mailer.unwrap_or_else(|| Arc::new(LogMailer)),
            settings: self.settings.unwrap_or_default(),
        })
    }
}
