//! Access token claims and the scopes they are valid in
//!
//! Every token pair is minted for exactly one [`TokenScope`]. The scope decides
//! which cookie pair carries the tokens and which ttl policy applies, and a
//! validator only accepts claims whose scope matches the one it expects.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::User;
use crate::value_objects::UserId;

/// What an OTP-scoped session is allowed to unlock once the code is verified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    /// Verify the email address, then receive app access
    AccessApp,
    /// Authorize a password change
    ChangePassword,
}

/// Usage context of a token pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenScope {
    #[serde(rename = "access_app")]
    App,
    #[serde(rename = "otp")]
    Otp,
    #[serde(rename = "change_password")]
    ChangePassword,
}

/// Cookie names used to carry one scope's token pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieNames {
    pub access: &'static str,
    pub refresh: &'static str,
}

impl TokenScope {
    pub const ALL: [Self; 3] = [Self::App, Self::Otp, Self::ChangePassword];

    /// Wire name of the scope
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::App => "access_app",
            Self::Otp => "otp",
            Self::ChangePassword => "change_password",
        }
    }

    /// Distinct cookie pair for this scope
    pub const fn cookie_names(self) -> CookieNames {
        match self {
            Self::App => CookieNames {
                access: "access_token",
                refresh: "refresh_token",
            },
            Self::Otp => CookieNames {
                access: "otp_access_token",
                refresh: "otp_refresh_token",
            },
            Self::ChangePassword => CookieNames {
                access: "password_access_token",
                refresh: "password_refresh_token",
            },
        }
    }
}

impl fmt::Display for TokenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload embedded in a signed access token and persisted with its refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AccessClaims {
    /// Normal application access
    #[serde(rename = "access_app")]
    AppAccess { user_id: UserId, username: String },

    /// Pending OTP verification
    #[serde(rename = "otp")]
    OtpAccess {
        user_id: UserId,
        email: String,
        mode: OtpPurpose,
    },

    /// Authorized to set a new password
    #[serde(rename = "change_password")]
    PasswordChangeAccess { user_id: UserId, username: String },
}

impl AccessClaims {
    pub fn app_access(user: &User) -> Self {
        Self::AppAccess {
            user_id: user.id,
            username: user.username.clone(),
        }
    }

    pub fn otp_access(user: &User, mode: OtpPurpose) -> Self {
        Self::OtpAccess {
            user_id: user.id,
            email: user.email.clone(),
            mode,
        }
    }

    pub fn password_change(user: &User) -> Self {
        Self::PasswordChangeAccess {
            user_id: user.id,
            username: user.username.clone(),
        }
    }

    /// Scope this payload is valid in
    pub const fn scope(&self) -> TokenScope {
        match self {
            Self::AppAccess { .. } => TokenScope::App,
            Self::OtpAccess { .. } => TokenScope::Otp,
            Self::PasswordChangeAccess { .. } => TokenScope::ChangePassword,
        }
    }

    pub const fn user_id(&self) -> UserId {
        match self {
            Self::AppAccess { user_id, .. }
            | Self::OtpAccess { user_id, .. }
            | Self::PasswordChangeAccess { user_id, .. } => *user_id,
        }
    }
}
