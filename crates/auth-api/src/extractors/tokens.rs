//! Token lookup
//!
//! Cookies win. When a cookie is absent the access token falls back to
//! `Authorization: Bearer` and the refresh token to the `refresh-token`
//! header. Empty values count as absent.

use auth_core::CookieNames;
use auth_service::ExtractedTokens;
use axum::http::{header, HeaderMap};
use axum_extra::extract::cookie::CookieJar;

/// Header carrying the refresh token for clients without cookies
pub const REFRESH_TOKEN_HEADER: &str = "refresh-token";

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn cookie(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name).and_then(|c| non_empty(c.value()))
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(non_empty)
}

fn refresh_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REFRESH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(non_empty)
}

/// Pull the candidate tokens for one scope out of a request
pub fn extract_tokens(jar: &CookieJar, headers: &HeaderMap, names: CookieNames) -> ExtractedTokens {
    ExtractedTokens::new(
        cookie(jar, names.access).or_else(|| bearer(headers)),
        cookie(jar, names.refresh).or_else(|| refresh_header(headers)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth_core::TokenScope;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_cookie_takes_precedence() {
        let headers = headers(&[
            ("cookie", "access_token=from-cookie; refresh_token=r-cookie"),
            ("authorization", "Bearer from-header"),
            ("refresh-token", "r-header"),
        ]);
        let jar = CookieJar::from_headers(&headers);

        let tokens = extract_tokens(&jar, &headers, TokenScope::App.cookie_names());
        assert_eq!(tokens.access.as_deref(), Some("from-cookie"));
        assert_eq!(tokens.refresh.as_deref(), Some("r-cookie"));
    }

    #[test]
    fn test_header_fallback() {
        let headers = headers(&[
            ("authorization", "Bearer from-header"),
            ("refresh-token", "r-header"),
        ]);
        let jar = CookieJar::from_headers(&headers);

        let tokens = extract_tokens(&jar, &headers, TokenScope::Otp.cookie_names());
        assert_eq!(tokens.access.as_deref(), Some("from-header"));
        assert_eq!(tokens.refresh.as_deref(), Some("r-header"));
    }

    #[test]
    fn test_other_scope_cookies_are_ignored() {
        let headers = headers(&[("cookie", "access_token=app; refresh_token=app-r")]);
        let jar = CookieJar::from_headers(&headers);

        let tokens = extract_tokens(&jar, &headers, TokenScope::ChangePassword.cookie_names());
        assert_eq!(tokens, ExtractedTokens::default());
    }

    #[test]
    fn test_empty_values_are_absent() {
        let headers = headers(&[
            ("cookie", "otp_access_token=; otp_refresh_token=r"),
            ("authorization", "Bearer "),
        ]);
        let jar = CookieJar::from_headers(&headers);

        let tokens = extract_tokens(&jar, &headers, TokenScope::Otp.cookie_names());
        assert!(tokens.access.is_none());
        assert_eq!(tokens.refresh.as_deref(), Some("r"));
    }
}
