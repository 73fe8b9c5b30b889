//! Scoped session extractor
//!
//! A handler asks for `Session<S>`; the tokens for scope `S` are pulled from
//! the request and run through the token lifecycle engine. When the refresh
//! token was redeemed the new pair rides along in `rotated`, and the handler
//! must write it back as cookies.

use std::marker::PhantomData;

use auth_core::{AccessClaims, TokenScope};
use auth_service::TokenPair;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;

use super::tokens::extract_tokens;
use crate::response::ApiError;
use crate::state::AppState;

/// Marker for the scope a route accepts
pub trait SessionScope: Send + Sync + 'static {
    const SCOPE: TokenScope;
}

#[derive(Debug, Clone, Copy)]
pub struct AppScope;

#[derive(Debug, Clone, Copy)]
pub struct OtpScope;

#[derive(Debug, Clone, Copy)]
pub struct PasswordScope;

impl SessionScope for AppScope {
    const SCOPE: TokenScope = TokenScope::App;
}

impl SessionScope for OtpScope {
    const SCOPE: TokenScope = TokenScope::Otp;
}

impl SessionScope for PasswordScope {
    const SCOPE: TokenScope = TokenScope::ChangePassword;
}

/// Validated session for scope `S`
#[derive(Debug, Clone)]
pub struct Session<S: SessionScope> {
    pub claims: AccessClaims,
    /// New pair when the refresh token was redeemed
    pub rotated: Option<TokenPair>,
    _scope: PhantomData<S>,
}

pub type AppSession = Session<AppScope>;
pub type OtpSession = Session<OtpScope>;
pub type PasswordSession = Session<PasswordScope>;

#[async_trait]
impl<S, St> FromRequestParts<St> for Session<S>
where
    S: SessionScope,
    St: Send + Sync,
    AppState: FromRef<St>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &St) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        let tokens = extract_tokens(&jar, &parts.headers, S::SCOPE.cookie_names());

        let validated = app_state.tokens().validate(&tokens, S::SCOPE).await?;

        Ok(Self {
            claims: validated.claims,
            rotated: validated.rotated,
            _scope: PhantomData,
        })
    }
}
