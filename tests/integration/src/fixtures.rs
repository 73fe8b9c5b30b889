//! Test fixtures and data generators
//!
//! Provides reusable request and response bodies for integration tests.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

pub const TEST_PASSWORD: &str = "SecurePass1";

/// Signup request
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            first_name: "Test".to_string(),
            last_name: format!("User{suffix}"),
            email: format!("test{suffix}@example.com"),
            password: TEST_PASSWORD.to_string(),
        }
    }

    pub fn login(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

/// Login request
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyOtpRequest {
    pub otp: String,
}

#[derive(Debug, Serialize)]
pub struct StartPasswordChangeRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ChangePasswordRequest {
    pub password: String,
}

/// Token pair returned by signup, login and OTP verification
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub message: Option<String>,
    pub access_token: String,
    pub refresh_token: String,
    pub username: Option<String>,
    pub verified: bool,
}

#[derive(Debug, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Body of the session validation endpoint
#[derive(Debug, Deserialize)]
pub struct ValidationResponse {
    pub tokens: Option<TokenPair>,
    pub data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Public profile
#[derive(Debug, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// Error envelope
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
