//! Token lifetimes per scope

use auth_common::TokenTtlConfig;
use auth_core::{RefreshTtl, TokenScope};

/// Lifetimes applied to one scope's token pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopePolicy {
    pub access_ttl_seconds: i64,
    pub refresh_ttl: RefreshTtl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    pub app: ScopePolicy,
    pub otp: ScopePolicy,
    pub change_password: ScopePolicy,
}

impl TokenPolicy {
    pub const fn for_scope(&self, scope: TokenScope) -> ScopePolicy {
        match scope {
            TokenScope::App => self.app,
            TokenScope::Otp => self.otp,
            TokenScope::ChangePassword => self.change_password,
        }
    }
}

impl From<&TokenTtlConfig> for TokenPolicy {
    fn from(config: &TokenTtlConfig) -> Self {
        Self {
            app: ScopePolicy {
                access_ttl_seconds: config.app_access_seconds,
                refresh_ttl: RefreshTtl::Days(config.app_refresh_days),
            },
            otp: ScopePolicy {
                access_ttl_seconds: config.otp_access_seconds,
                refresh_ttl: RefreshTtl::Seconds(config.otp_refresh_seconds),
            },
            change_password: ScopePolicy {
                access_ttl_seconds: config.password_access_seconds,
                refresh_ttl: RefreshTtl::Seconds(config.password_refresh_seconds),
            },
        }
    }
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self::from(&TokenTtlConfig::default())
    }
}
