//! Account handlers
//!
//! Endpoints for signup and login.

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;
use auth_service::dto::{AuthResponse, LoginRequest, SignupRequest};
use auth_service::{AuthOutcome, AuthService};

use crate::cookies;
use crate::extractors::ValidatedJson;
use crate::response::{ApiResult, Created};
use crate::state::AppState;

fn respond(
    state: &AppState,
    jar: CookieJar,
    outcome: &AuthOutcome,
) -> (CookieJar, Json<AuthResponse>) {
    let jar = cookies::set_pair(jar, &outcome.pair, state.secure_cookies());
    (jar, Json(AuthResponse::from(outcome)))
}

/// Register a new account
///
/// POST /api/signup
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> ApiResult<Created<(CookieJar, Json<AuthResponse>)>> {
    let outcome = AuthService::new(state.service_context())
        .signup(request)
        .await?;
    Ok(Created(respond(&state, jar, &outcome)))
}

/// Login with email and password
///
/// Answers 403 with an OTP pair while the email address is unverified.
///
/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<(StatusCode, CookieJar, Json<AuthResponse>)> {
    let outcome = AuthService::new(state.service_context())
        .login(request)
        .await?;

    let status = if outcome.verified {
        StatusCode::OK
    } else {
        StatusCode::FORBIDDEN
    };
    let (jar, body) = respond(&state, jar, &outcome);
    Ok((status, jar, body))
}
