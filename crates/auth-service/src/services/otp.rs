//! One-time passcode service
//!
//! Issues six-digit codes by email and exchanges a correct code for the pair
//! the OTP session was opened for.

use auth_common::generate_otp_code;
use auth_core::{AccessClaims, OtpPurpose, OtpRecord, TokenScope, User};
use chrono::{Duration, Utc};
use tracing::{info, instrument, warn};

use crate::mail::{otp_email_template, MailMessage};
use crate::tokens::TokenPair;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

const OTP_SUBJECT: &str = "Confirm your email address";

/// Pair issued after a successful verification
#[derive(Debug, Clone)]
pub struct OtpVerification {
    pub purpose: OtpPurpose,
    pub pair: TokenPair,
}

/// OTP service
pub struct OtpService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> OtpService<'a> {
    /// Create a new OtpService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    async fn find_user(&self, email: &str) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_email(email)
            .await?
            .ok_or_else(|| {
                warn!(email = %email, "OTP requested for unknown email");
                ServiceError::not_found("Email", email)
            })
    }

    /// Replace any outstanding code for `email` with a fresh one and mail it
    #[instrument(skip(self))]
    pub async fn create_otp(&self, email: &str) -> ServiceResult<()> {
        self.find_user(email).await?;

        let removed = self.ctx.otp_repo().delete_all_for_email(email).await?;
        if removed > 0 {
            info!(removed, "Discarded previous OTPs");
        }

        let code = generate_otp_code();
        let record = OtpRecord::new(
            email.to_string(),
            self.ctx.otp_hasher().hash(&code),
            Duration::seconds(self.ctx.settings().otp_ttl_seconds),
        );
        self.ctx.otp_repo().create(&record).await?;

        let message = MailMessage {
            from: self.ctx.settings().mail_from.clone(),
            to: email.to_string(),
            subject: OTP_SUBJECT.to_string(),
            html: otp_email_template(&code),
        };
        match self.ctx.mailer().send(&message).await {
            Ok(()) => info!("OTP created and sent"),
            Err(e) => warn!(error = %e, "OTP created but the email could not be sent"),
        }

        Ok(())
    }

    /// Redeem `candidate` for the session described by `claims`
    #[instrument(skip(self, claims, candidate), fields(user_id = %claims.user_id()))]
    pub async fn verify_otp(
        &self,
        claims: &AccessClaims,
        candidate: &str,
    ) -> ServiceResult<OtpVerification> {
        let AccessClaims::OtpAccess { email, mode, .. } = claims else {
            return Err(ServiceError::mode_mismatch(TokenScope::Otp, claims.scope()));
        };

        let user = self.find_user(email).await?;
        let token_hash = self.ctx.otp_hasher().hash(candidate.trim());

        let record = self
            .ctx
            .otp_repo()
            .find(email, &token_hash)
            .await?
            .ok_or_else(|| {
                warn!("OTP does not match");
                ServiceError::App(auth_common::AppError::InvalidOtp)
            })?;

        if record.is_expired_at(Utc::now()) {
            warn!(expires_at = %record.expires_at, "OTP expired");
            return Err(ServiceError::App(auth_common::AppError::InvalidOtp));
        }

        if !self.ctx.otp_repo().delete(email, &token_hash).await? {
            warn!("OTP already redeemed by a concurrent request");
            return Err(ServiceError::App(auth_common::AppError::InvalidOtp));
        }

        if !user.authenticated {
            self.ctx.user_repo().set_authenticated(user.id).await?;
            info!("Email address verified");
        }

        let next = match mode {
            OtpPurpose::AccessApp => AccessClaims::app_access(&user),
            OtpPurpose::ChangePassword => AccessClaims::password_change(&user),
        };
        let pair = self.ctx.tokens().issue(&next).await?;

        info!(purpose = ?mode, "OTP verified");
        Ok(OtpVerification {
            purpose: *mode,
            pair,
        })
    }

    /// Drop codes past their expiry; they can no longer be redeemed
    pub async fn purge_expired(&self) -> ServiceResult<u64> {
        Ok(self.ctx.otp_repo().purge_expired(Utc::now()).await?)
    }
}
