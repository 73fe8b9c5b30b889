//! # auth-service
//!
//! Application layer: the token lifecycle engine, OTP issuance and
//! verification, account use cases, outgoing mail and DTOs.

pub mod dto;
pub mod mail;
pub mod services;
pub mod tokens;

pub use mail::{
    build_mailer, otp_email_template, HttpMailer, LogMailer, MailError, MailMessage, Mailer,
};
pub use services::{
    AuthOutcome, AuthService, OtpService, OtpVerification, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, ServiceSettings, UnauthorizedReason, UserService,
};
pub use tokens::{
    ExtractedTokens, RefreshTokenStore, ScopePolicy, TokenLifecycleEngine, TokenPair, TokenPolicy,
    Validated, PURGE_GRACE_SECONDS,
};
