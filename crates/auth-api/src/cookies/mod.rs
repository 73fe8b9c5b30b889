//! Token cookies
//!
//! Each scope has its own cookie pair, so an OTP session never overwrites
//! an app session in the same browser.

use auth_core::TokenScope;
use auth_service::TokenPair;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

fn token_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Add both tokens of `pair` under the cookie names of its scope
pub fn set_pair(jar: CookieJar, pair: &TokenPair, secure: bool) -> CookieJar {
    let names = pair.scope.cookie_names();
    jar.add(token_cookie(names.access, pair.access_token.clone(), secure))
        .add(token_cookie(names.refresh, pair.refresh_token.clone(), secure))
}

/// Add the rotated pair, if any
pub fn set_rotated(jar: CookieJar, rotated: Option<&TokenPair>, secure: bool) -> CookieJar {
    match rotated {
        Some(pair) => set_pair(jar, pair, secure),
        None => jar,
    }
}

/// Expire both cookies of `scope`
pub fn clear_scope(jar: CookieJar, scope: TokenScope) -> CookieJar {
    let names = scope.cookie_names();
    jar.remove(Cookie::build(names.access).path("/"))
        .remove(Cookie::build(names.refresh).path("/"))
}
