//! OTP handlers
//!
//! Both endpoints require an OTP session.

use auth_core::{AccessClaims, OtpPurpose, TokenScope};
use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use auth_service::dto::{AuthResponse, MessageResponse, VerifyOtpRequest};
use auth_service::{OtpService, ServiceError};

use crate::cookies;
use crate::extractors::{OtpSession, ValidatedJson};
use crate::response::{ApiError, Created, SessionResult, WithCookies};
use crate::state::AppState;

/// Mail a fresh code to the address the OTP session was opened for
///
/// POST /api/otp/create
pub async fn create(
    State(state): State<AppState>,
    session: OtpSession,
    jar: CookieJar,
) -> SessionResult<Created<Json<MessageResponse>>> {
    let jar = cookies::set_rotated(jar, session.rotated.as_ref(), state.secure_cookies());

    let result = match &session.claims {
        AccessClaims::OtpAccess { email, .. } => {
            OtpService::new(state.service_context())
                .create_otp(email)
                .await
        }
        other => Err(ServiceError::mode_mismatch(TokenScope::Otp, other.scope())),
    };

    result
        .map(|()| {
            Created(Json(MessageResponse::new(
                "OTP successfully created and sent to email address",
            )))
        })
        .with_cookies(jar)
}

/// Exchange a code for the pair the OTP session was opened for
///
/// The OTP cookies are cleared; the new pair is set under its own names.
///
/// POST /api/otp/verify
pub async fn verify(
    State(state): State<AppState>,
    session: OtpSession,
    jar: CookieJar,
    body: Result<ValidatedJson<VerifyOtpRequest>, ApiError>,
) -> SessionResult<Json<AuthResponse>> {
    let jar = cookies::set_rotated(jar, session.rotated.as_ref(), state.secure_cookies());
    let ValidatedJson(request) = match body {
        Ok(body) => body,
        Err(e) => return Err((jar, e)),
    };

    let verified = match OtpService::new(state.service_context())
        .verify_otp(&session.claims, &request.otp)
        .await
    {
        Ok(verified) => verified,
        Err(e) => return Err((jar, e.into())),
    };

    let jar = cookies::clear_scope(jar, TokenScope::Otp);
    let jar = cookies::set_pair(jar, &verified.pair, state.secure_cookies());

    let response = AuthResponse::new(&verified.pair, true);
    let response = match verified.purpose {
        OtpPurpose::AccessApp => response.with_message("Email address verified"),
        OtpPurpose::ChangePassword => response.with_message("Password change authorized"),
    };
    Ok((jar, Json(response)))
}
