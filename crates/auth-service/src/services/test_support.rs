//! Shared fixtures for service tests

use std::sync::Arc;

use async_trait::async_trait;
use auth_common::{generate_otp_code, OtpHasher, PasswordService, TokenCodec};
use auth_core::{OtpRecord, OtpRepository, User, UserId, UserRepository};
use auth_db::{MemoryOtpRepository, MemoryRefreshTokenRepository, MemoryUserRepository};
use chrono::Duration;
use parking_lot::Mutex;

use crate::mail::{MailError, MailMessage, Mailer};

use super::context::{ServiceContext, ServiceContextBuilder, ServiceSettings};

pub const OTP_SECRET: &str = "test-otp-secret";

/// Keeps every message; optionally fails after recording it
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        self.sent.lock().push(message.clone());
        if self.fail {
            return Err(MailError::Rejected(502));
        }
        Ok(())
    }
}

pub struct Harness {
    pub ctx: ServiceContext,
    pub users: Arc<MemoryUserRepository>,
    pub otps: Arc<MemoryOtpRepository>,
    pub mailer: Arc<RecordingMailer>,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(ServiceSettings::default(), false)
    }

    pub fn with_settings(settings: ServiceSettings) -> Self {
        Self::build(settings, false)
    }

    pub fn with_failing_mailer() -> Self {
        Self::build(ServiceSettings::default(), true)
    }

    fn build(settings: ServiceSettings, failing_mail: bool) -> Self {
        let users = Arc::new(MemoryUserRepository::new());
        let otps = Arc::new(MemoryOtpRepository::new());
        let mailer = Arc::new(RecordingMailer {
            fail: failing_mail,
            ..RecordingMailer::default()
        });

        let ctx = ServiceContextBuilder::new()
            .user_repo(users.clone())
            .otp_repo(otps.clone())
            .refresh_token_repo(Arc::new(MemoryRefreshTokenRepository::new()))
            .codec(TokenCodec::new("test-jwt-secret"))
            .otp_hasher(OtpHasher::new(OTP_SECRET).unwrap())
            .mailer(mailer.clone())
            .settings(settings)
            .build()
            .unwrap();

        Self {
            ctx,
            users,
            otps,
            mailer,
        }
    }

    /// Insert a user whose password is `SecurePass1`
    pub async fn user(&self, email: &str, authenticated: bool) -> User {
        let user = User::new(
            UserId::new(),
            email.to_string(),
            email.split('@').next().unwrap().to_string(),
            "Jane".to_string(),
            "Doe".to_string(),
        );
        let hash = PasswordService::new().hash("SecurePass1").unwrap();
        self.users.create(&user, &hash).await.unwrap();
        if authenticated {
            self.users.set_authenticated(user.id).await.unwrap();
        }
        self.users_find(email).await
    }

    pub async fn users_find(&self, email: &str) -> User {
        self.users.find_by_email(email).await.unwrap().unwrap()
    }

    pub async fn users_list(&self) -> Vec<User> {
        self.users.list().await.unwrap()
    }

    /// Store a code directly and return it in clear
    pub async fn seed_otp(&self, email: &str, ttl: Duration) -> String {
        let code = generate_otp_code();
        let hash = OtpHasher::new(OTP_SECRET).unwrap().hash(&code);
        self.otps
            .create(&OtpRecord::new(email.to_string(), hash, ttl))
            .await
            .unwrap();
        code
    }
}
