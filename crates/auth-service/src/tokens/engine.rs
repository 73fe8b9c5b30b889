//! Token lifecycle engine
//!
//! Issues access/refresh pairs for a scope, validates presented tokens
//! against an expected scope and rotates the refresh token when the access
//! token no longer verifies.
//!
//! A verified access token is accepted without touching the store. Otherwise
//! the refresh token is redeemed: found, deleted (only one concurrent caller
//! wins), checked for expiry and scope, and replaced by a successor carrying
//! the same claims.

use auth_common::TokenCodec;
use auth_core::{AccessClaims, TokenScope};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::services::{ServiceError, ServiceResult, UnauthorizedReason};

use super::policy::TokenPolicy;
use super::store::RefreshTokenStore;

/// Access and refresh token minted together for one scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(skip)]
    pub scope: TokenScope,
}

/// Candidate tokens pulled out of a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedTokens {
    pub access: Option<String>,
    pub refresh: Option<String>,
}

impl ExtractedTokens {
    pub fn new(access: Option<String>, refresh: Option<String>) -> Self {
        Self { access, refresh }
    }
}

/// Outcome of a successful validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated {
    pub claims: AccessClaims,
    /// Set when the refresh token was redeemed; the caller must hand the new
    /// pair back to the client
    pub rotated: Option<TokenPair>,
}

pub struct TokenLifecycleEngine {
    codec: TokenCodec,
    store: RefreshTokenStore,
    policy: TokenPolicy,
}

impl TokenLifecycleEngine {
    pub fn new(codec: TokenCodec, store: RefreshTokenStore, policy: TokenPolicy) -> Self {
        Self {
            codec,
            store,
            policy,
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn policy(&self) -> &TokenPolicy {
        &self.policy
    }

    /// Mint a pair for the scope of `claims`
    #[instrument(skip(self, claims), fields(scope = %claims.scope(), user_id = %claims.user_id()))]
    pub async fn issue(&self, claims: &AccessClaims) -> ServiceResult<TokenPair> {
        let scope = claims.scope();
        let policy = self.policy.for_scope(scope);

        let access_token = self.codec.sign(claims, policy.access_ttl_seconds)?;
        let refresh_token = self.store.create(claims, policy.refresh_ttl).await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            scope,
        })
    }

    /// Accept the presented tokens for `expected`, rotating if needed
    #[instrument(skip(self, tokens), fields(expected = %expected))]
    pub async fn validate(
        &self,
        tokens: &ExtractedTokens,
        expected: TokenScope,
    ) -> ServiceResult<Validated> {
        if let Some(access) = tokens.access.as_deref() {
            match self.codec.verify(access) {
                Ok(claims) if claims.scope() == expected => {
                    return Ok(Validated {
                        claims,
                        rotated: None,
                    });
                }
                Ok(claims) => {
                    warn!(actual = %claims.scope(), "Access token presented outside its scope");
                    return Err(ServiceError::mode_mismatch(expected, claims.scope()));
                }
                Err(reason) => {
                    debug!(%reason, "Access token not accepted");
                }
            }
        }

        let Some(refresh) = tokens.refresh.as_deref() else {
            return Err(ServiceError::Unauthorized(UnauthorizedReason::MissingToken));
        };

        self.redeem(refresh, expected).await
    }

    async fn redeem(&self, id: &str, expected: TokenScope) -> ServiceResult<Validated> {
        let Some(record) = self.store.find(id).await? else {
            warn!("Unknown refresh token presented");
            return Err(ServiceError::Unauthorized(UnauthorizedReason::TokenNotFound));
        };

        if !self.store.delete(id).await? {
            warn!("Refresh token already redeemed by a concurrent request");
            return Err(ServiceError::Unauthorized(UnauthorizedReason::TokenNotFound));
        }

        if record.is_expired_at(Utc::now()) {
            info!(expires_at = %record.expires_at, "Expired refresh token consumed");
            return Err(ServiceError::Unauthorized(UnauthorizedReason::TokenExpired));
        }

        if record.scope() != expected {
            warn!(actual = %record.scope(), "Refresh token presented outside its scope");
            return Err(ServiceError::mode_mismatch(expected, record.scope()));
        }

        let rotated = self.issue(&record.claims).await?;
        info!(user_id = %record.claims.user_id(), "Refresh token rotated");

        Ok(Validated {
            claims: record.claims,
            rotated: Some(rotated),
        })
    }

    /// Read an access token payload without checking signature or expiry
    pub fn decode(&self, access_token: Option<&str>) -> Option<serde_json::Value> {
        let token = access_token?;
        match self.codec.decode_unverified(token) {
            Ok(payload) => Some(payload),
            Err(reason) => {
                debug!(%reason, "Token could not be decoded");
                None
            }
        }
    }

    /// Remove refresh records well past their expiry
    pub async fn purge_expired(&self) -> ServiceResult<u64> {
        self.store.purge_expired().await
    }
}

impl std::fmt::Debug for TokenLifecycleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenLifecycleEngine")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
