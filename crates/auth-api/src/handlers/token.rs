//! Token handlers

use auth_core::TokenScope;
use axum::{extract::State, http::HeaderMap, Json};
use axum_extra::extract::cookie::CookieJar;
use auth_service::dto::{DecodedTokenResponse, TokenValidationResponse};

use crate::cookies;
use crate::extractors::{extract_tokens, AppSession};
use crate::state::AppState;

/// Validate the app session, rotating it when the access token has lapsed
///
/// POST /api/token/validate
pub async fn validate(
    State(state): State<AppState>,
    session: AppSession,
    jar: CookieJar,
) -> (CookieJar, Json<TokenValidationResponse>) {
    let jar = cookies::set_rotated(jar, session.rotated.as_ref(), state.secure_cookies());
    let body = TokenValidationResponse {
        tokens: session.rotated,
        data: session.claims,
    };
    (jar, Json(body))
}

/// Payload of the app access token, without verifying it
///
/// POST /api/token/decode
pub async fn decode(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Json<DecodedTokenResponse> {
    let tokens = extract_tokens(&jar, &headers, TokenScope::App.cookie_names());
    Json(DecodedTokenResponse {
        decoded_token: state.tokens().decode(tokens.access.as_deref()),
    })
}
