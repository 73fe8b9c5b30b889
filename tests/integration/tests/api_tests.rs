//! API Integration Tests
//!
//! Each test spawns its own server on in-memory storage, so no external
//! services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, fixtures::*, set_cookie_names, TestServer,
};
use reqwest::{Method, StatusCode};

const NO_BODY: Option<&()> = None;

async fn signup(server: &TestServer, request: &SignupRequest) -> AuthResponse {
    let response = server.post("/api/signup", request).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

/// Run the OTP exchange for a pending OTP session and return the new pair
async fn complete_otp(server: &TestServer, email: &str, otp_access: &str) -> AuthResponse {
    let response = server
        .send_bearer(Method::POST, "/api/otp/create", otp_access, NO_BODY)
        .await
        .unwrap();
    let created: MessageResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(
        created.message,
        "OTP successfully created and sent to email address"
    );

    let code = server.inbox.last_code_for(email).expect("code was mailed");
    let response = server
        .send_bearer(
            Method::POST,
            "/api/otp/verify",
            otp_access,
            Some(&VerifyOtpRequest { otp: code }),
        )
        .await
        .unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Signup & Login Tests
// ============================================================================

#[tokio::test]
async fn test_signup_issues_app_pair() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = SignupRequest::unique();

    let response = server.post("/api/signup", &request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let cookies = set_cookie_names(&response);
    assert!(cookies.contains(&"access_token".to_string()));
    assert!(cookies.contains(&"refresh_token".to_string()));

    let auth: AuthResponse = response.json().await.unwrap();
    assert!(auth.verified);
    assert!(!auth.access_token.is_empty());
    assert_eq!(auth.refresh_token.len(), 32);
    assert!(auth.username.unwrap().starts_with("test.user"));
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = SignupRequest::unique();
    signup(&server, &request).await;

    let mut again = SignupRequest::unique();
    again.email = request.email.to_uppercase();
    let response = server.post("/api/signup", &again).await.unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();
}

#[tokio::test]
async fn test_signup_weak_password() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut request = SignupRequest::unique();
    request.password = "password".to_string();

    let response = server.post("/api/signup", &request).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_login() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = SignupRequest::unique();
    signup(&server, &request).await;

    let response = server.post("/api/login", &request.login()).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(auth.verified);
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = SignupRequest::unique();
    signup(&server, &request).await;

    let mut login = request.login();
    login.password = "WrongPass1".to_string();
    let response = server.post("/api/login", &login).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let login = LoginRequest {
        email: "nobody@example.com".to_string(),
        password: TEST_PASSWORD.to_string(),
    };
    let response = server.post("/api/login", &login).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Session Validation Tests
// ============================================================================

#[tokio::test]
async fn test_validate_with_access_token() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = signup(&server, &SignupRequest::unique()).await;

    let response = server
        .send_bearer(Method::POST, "/api/token/validate", &auth.access_token, NO_BODY)
        .await
        .unwrap();
    assert!(set_cookie_names(&response).is_empty());

    let body: ValidationResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.tokens.is_none());
    assert_eq!(body.data["type"], "access_app");
}

#[tokio::test]
async fn test_refresh_token_rotates_once() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = signup(&server, &SignupRequest::unique()).await;

    let response = server
        .post_refresh("/api/validate-token", &auth.refresh_token)
        .await
        .unwrap();
    let cookies = set_cookie_names(&response);
    assert_eq!(cookies, vec!["access_token", "refresh_token"]);

    let body: ValidationResponse = assert_json(response, StatusCode::OK).await.unwrap();
    let rotated = body.tokens.expect("pair was rotated");
    assert_ne!(rotated.refresh_token, auth.refresh_token);

    // The redeemed token is gone for good
    let response = server
        .post_refresh("/api/token/validate", &auth.refresh_token)
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(error.error.code, "UNAUTHORIZED");
    assert!(error.error.message.contains("token doesn't exist"));

    // The replacement works
    let response = server
        .post_refresh("/api/token/validate", &rotated.refresh_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_garbage_access_token_falls_back_to_refresh() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = signup(&server, &SignupRequest::unique()).await;

    let response = server
        .request(Method::POST, "/api/token/validate")
        .bearer_auth("not-a-jwt")
        .header(integration_tests::REFRESH_TOKEN_HEADER, &auth.refresh_token)
        .send()
        .await
        .unwrap();
    let body: ValidationResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.tokens.is_some());
}

#[tokio::test]
async fn test_validate_without_tokens() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .request(Method::POST, "/api/token/validate")
        .send()
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_decode_token() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = signup(&server, &SignupRequest::unique()).await;

    let response = server
        .send_bearer(Method::POST, "/api/token/decode", &auth.access_token, NO_BODY)
        .await
        .unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["decoded_token"]["type"], "access_app");

    let response = server
        .send_bearer(Method::POST, "/api/token/decode", "garbage", NO_BODY)
        .await
        .unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body["decoded_token"].is_null());
}

// ============================================================================
// Email Verification Tests
// ============================================================================

#[tokio::test]
async fn test_unverified_signup_gets_otp_pair() {
    let server = TestServer::start_with(&[("REQUIRE_EMAIL_VERIFICATION", "true")])
        .await
        .expect("Failed to start server");
    let request = SignupRequest::unique();

    let response = server.post("/api/signup", &request).await.unwrap();
    let cookies = set_cookie_names(&response);
    assert_eq!(cookies, vec!["otp_access_token", "otp_refresh_token"]);

    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert!(!auth.verified);
    assert_eq!(auth.message.as_deref(), Some("Unverified email address"));

    // An OTP pair never opens an app session
    let response = server
        .send_bearer(Method::POST, "/api/token/validate", &auth.access_token, NO_BODY)
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert!(error
        .error
        .message
        .contains("token issued for 'otp' cannot be used for 'access_app'"));

    let response = server.post("/api/login", &request.login()).await.unwrap();
    let login: AuthResponse = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert!(!login.verified);
}

#[tokio::test]
async fn test_email_verification_flow() {
    let server = TestServer::start_with(&[("REQUIRE_EMAIL_VERIFICATION", "true")])
        .await
        .expect("Failed to start server");
    let request = SignupRequest::unique();
    let pending = signup(&server, &request).await;

    let verified = complete_otp(&server, &request.email, &pending.access_token).await;
    assert!(verified.verified);
    assert_eq!(verified.message.as_deref(), Some("Email address verified"));

    let response = server
        .send_bearer(
            Method::POST,
            "/api/token/validate",
            &verified.access_token,
            NO_BODY,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.post("/api/login", &request.login()).await.unwrap();
    let login: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(login.verified);
}

#[tokio::test]
async fn test_wrong_otp_is_rejected() {
    let server = TestServer::start_with(&[("REQUIRE_EMAIL_VERIFICATION", "true")])
        .await
        .expect("Failed to start server");
    let request = SignupRequest::unique();
    let pending = signup(&server, &request).await;

    let response = server
        .send_bearer(Method::POST, "/api/otp/create", &pending.access_token, NO_BODY)
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(server.inbox.count(), 1);

    let code = server.inbox.last_code_for(&request.email).unwrap();
    let wrong = if code == "123456" { "654321" } else { "123456" };
    let response = server
        .send_bearer(
            Method::POST,
            "/api/otp/verify",
            &pending.access_token,
            Some(&VerifyOtpRequest {
                otp: wrong.to_string(),
            }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Password Change Tests
// ============================================================================

#[tokio::test]
async fn test_password_change_flow() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = SignupRequest::unique();
    signup(&server, &request).await;

    let response = server
        .post(
            "/api/change-password/verify",
            &StartPasswordChangeRequest {
                email: request.email.clone(),
            },
        )
        .await
        .unwrap();
    let started: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert!(!started.verified);

    let authorized = complete_otp(&server, &request.email, &started.access_token).await;
    assert_eq!(
        authorized.message.as_deref(),
        Some("Password change authorized")
    );

    // A password change pair is not an app session
    let response = server
        .send_bearer(
            Method::POST,
            "/api/token/validate",
            &authorized.access_token,
            NO_BODY,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server
        .send_bearer(
            Method::PATCH,
            "/api/change-password/change",
            &authorized.access_token,
            Some(&ChangePasswordRequest {
                password: "BrandNewPass2".to_string(),
            }),
        )
        .await
        .unwrap();
    let changed: MessageResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(changed.message, "Updated password successfully");

    let response = server.post("/api/login", &request.login()).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let login = LoginRequest {
        email: request.email.clone(),
        password: "BrandNewPass2".to_string(),
    };
    let response = server.post("/api/login", &login).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_password_change_unknown_email() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .post(
            "/api/change-password/verify",
            &StartPasswordChangeRequest {
                email: "ghost@example.com".to_string(),
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// User Tests
// ============================================================================

#[tokio::test]
async fn test_list_and_get_users() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = SignupRequest::unique();
    let auth = signup(&server, &request).await;
    signup(&server, &SignupRequest::unique()).await;

    let response = server
        .send_bearer(Method::GET, "/api/users", &auth.access_token, NO_BODY)
        .await
        .unwrap();
    let users: Vec<UserProfile> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(users.len(), 2);

    let me = users
        .iter()
        .find(|u| u.last_name == request.last_name)
        .expect("signed up user is listed");
    assert_eq!(me.first_name, "Test");

    let response = server
        .send_bearer(
            Method::GET,
            &format!("/api/users/{}", me.id),
            &auth.access_token,
            NO_BODY,
        )
        .await
        .unwrap();
    let user: UserProfile = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(user.username, me.username);
}

#[tokio::test]
async fn test_get_unknown_user() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = signup(&server, &SignupRequest::unique()).await;

    let response = server
        .send_bearer(
            Method::GET,
            "/api/users/00000000-0000-4000-8000-000000000000",
            &auth.access_token,
            NO_BODY,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_users_require_session() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/api/users").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}
