//! Password change handlers
//!
//! Step one opens an OTP session for the account; once the code is verified
//! the client holds a change-password session and may set a new password.

use auth_core::TokenScope;
use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use auth_service::dto::{
    AuthResponse, ChangePasswordRequest, MessageResponse, StartPasswordChangeRequest,
};
use auth_service::AuthService;

use crate::cookies;
use crate::extractors::{PasswordSession, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created, SessionResult};
use crate::state::AppState;

/// Start a password change for an email address
///
/// POST /api/change-password/verify
pub async fn start(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<StartPasswordChangeRequest>,
) -> ApiResult<Created<(CookieJar, Json<AuthResponse>)>> {
    let pair = AuthService::new(state.service_context())
        .start_password_change(&request.email)
        .await?;

    let jar = cookies::set_pair(jar, &pair, state.secure_cookies());
    let response = AuthResponse::new(&pair, false)
        .with_message("Password access and refresh tokens created successfully");
    Ok(Created((jar, Json(response))))
}

/// Set the new password
///
/// PATCH /api/change-password/change
pub async fn change(
    State(state): State<AppState>,
    session: PasswordSession,
    jar: CookieJar,
    body: Result<ValidatedJson<ChangePasswordRequest>, ApiError>,
) -> SessionResult<Json<MessageResponse>> {
    let jar = cookies::set_rotated(jar, session.rotated.as_ref(), state.secure_cookies());
    let ValidatedJson(request) = match body {
        Ok(body) => body,
        Err(e) => return Err((jar, e)),
    };

    if let Err(e) = AuthService::new(state.service_context())
        .change_password(&session.claims, &request.password)
        .await
    {
        return Err((jar, e.into()));
    }

    let jar = cookies::clear_scope(jar, TokenScope::ChangePassword);
    Ok((jar, Json(MessageResponse::new("Updated password successfully"))))
}
