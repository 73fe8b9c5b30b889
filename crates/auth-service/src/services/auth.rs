//! Authentication service
//!
//! Handles signup, login and the password change flow.

use auth_common::validate_password_strength;
use auth_core::{AccessClaims, DomainError, OtpPurpose, TokenScope, User, UserId};
use rand::Rng;
use tracing::{info, instrument, warn};

use crate::dto::{LoginRequest, SignupRequest};
use crate::tokens::TokenPair;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Username candidates to try before giving up
const MAX_USERNAME_ATTEMPTS: usize = 10;

/// Pair issued by signup or login, with the user it belongs to
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub pair: TokenPair,
    pub user: User,
    /// `false` when the pair is an OTP pair waiting for email verification
    pub verified: bool,
}

/// Lowercased, trimmed form used for storage and lookups
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `first.last` with everything but ASCII letters and digits removed
fn base_username(first_name: &str, last_name: &str) -> String {
    let clean = |s: &str| -> String {
        s.chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect()
    };

    match (clean(first_name), clean(last_name)) {
        (first, last) if first.is_empty() && last.is_empty() => "user".to_string(),
        (first, last) if last.is_empty() => first,
        (first, last) if first.is_empty() => last,
        (first, last) => format!("{first}.{last}"),
    }
}

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new account
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn signup(&self, request: SignupRequest) -> ServiceResult<AuthOutcome> {
        validate_password_strength(&request.password)?;

        let email = normalize_email(&request.email);
        if self.ctx.user_repo().email_exists(&email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }

        let password_hash = self.ctx.passwords().hash(&request.password)?;
        let base = base_username(&request.first_name, &request.last_name);

        let mut user = None;
        for attempt in 0..MAX_USERNAME_ATTEMPTS {
            let candidate = if attempt == 0 {
                base.clone()
            } else {
                format!("{base}{}", rand::thread_rng().gen_range(1000..10000))
            };
            if self.ctx.user_repo().username_exists(&candidate).await? {
                continue;
            }

            let mut new_user = User::new(
                UserId::new(),
                email.clone(),
                candidate,
                request.first_name.trim().to_string(),
                request.last_name.trim().to_string(),
            );
            new_user.profile.phone_number.clone_from(&request.phone_number);
            new_user.profile.gender.clone_from(&request.gender);

            match self.ctx.user_repo().create(&new_user, &password_hash).await {
                Ok(()) => {
                    user = Some(new_user);
                    break;
                }
                Err(DomainError::UsernameTaken(name)) => {
                    warn!(username = %name, "Username claimed concurrently, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        let user = user.ok_or_else(|| {
            ServiceError::conflict(format!("Could not allocate a username for '{base}'"))
        })?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        self.outcome_for(user).await
    }

    /// Authenticate with email and password
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthOutcome> {
        let email = normalize_email(&request.email);

        let user = self
            .ctx
            .user_repo()
            .find_by_email(&email)
            .await?
            .ok_or_else(|| {
                warn!("Login attempt for unknown email");
                ServiceError::App(auth_common::AppError::InvalidCredentials)
            })?;

        let hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or_else(|| ServiceError::App(auth_common::AppError::InvalidCredentials))?;

        if let Err(e) = self.ctx.passwords().verify_login(&request.password, &hash) {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(e.into());
        }

        info!(user_id = %user.id, "User logged in");
        self.outcome_for(user).await
    }

    /// App pair for verified users, OTP pair while verification is pending
    async fn outcome_for(&self, user: User) -> ServiceResult<AuthOutcome> {
        let verified = user.authenticated || !self.ctx.settings().require_email_verification;
        let claims = if verified {
            AccessClaims::app_access(&user)
        } else {
            AccessClaims::otp_access(&user, OtpPurpose::AccessApp)
        };

        let pair = self.ctx.tokens().issue(&claims).await?;
        Ok(AuthOutcome {
            pair,
            user,
            verified,
        })
    }

    /// Open an OTP session that unlocks a password change for `email`
    #[instrument(skip(self))]
    pub async fn start_password_change(&self, email: &str) -> ServiceResult<TokenPair> {
        let email = normalize_email(email);
        let user = self
            .ctx
            .user_repo()
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ServiceError::not_found("Email", email.clone()))?;

        let pair = self
            .ctx
            .tokens()
            .issue(&AccessClaims::otp_access(&user, OtpPurpose::ChangePassword))
            .await?;

        info!(user_id = %user.id, "Password change started");
        Ok(pair)
    }

    /// Set a new password for the holder of a password change session
    #[instrument(skip(self, claims, new_password), fields(user_id = %claims.user_id()))]
    pub async fn change_password(
        &self,
        claims: &AccessClaims,
        new_password: &str,
    ) -> ServiceResult<()> {
        let AccessClaims::PasswordChangeAccess { user_id, .. } = claims else {
            return Err(ServiceError::mode_mismatch(
                TokenScope::ChangePassword,
                claims.scope(),
            ));
        };

        validate_password_strength(new_password)?;
        let hash = self.ctx.passwords().hash(new_password)?;
        self.ctx.user_repo().update_password(*user_id, &hash).await?;

        info!("Password updated");
        Ok(())
    }
}
