//! User handlers
//!
//! Public profiles, readable by any app session.

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use auth_service::dto::UserProfileResponse;
use auth_service::UserService;

use crate::cookies;
use crate::extractors::{AppSession, UserIdPath};
use crate::response::{SessionResult, WithCookies};
use crate::state::AppState;

/// List every user
///
/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    session: AppSession,
    jar: CookieJar,
) -> SessionResult<Json<Vec<UserProfileResponse>>> {
    let jar = cookies::set_rotated(jar, session.rotated.as_ref(), state.secure_cookies());

    UserService::new(state.service_context())
        .list_users()
        .await
        .map(Json)
        .with_cookies(jar)
}

/// Get a user by ID
///
/// The path is parsed before the session so a malformed id never consumes
/// a refresh token.
///
/// GET /api/users/:user_id
pub async fn get_user(
    State(state): State<AppState>,
    UserIdPath(user_id): UserIdPath,
    session: AppSession,
    jar: CookieJar,
) -> SessionResult<Json<UserProfileResponse>> {
    let jar = cookies::set_rotated(jar, session.rotated.as_ref(), state.secure_cookies());

    UserService::new(state.service_context())
        .get_user(user_id)
        .await
        .map(Json)
        .with_cookies(jar)
}
