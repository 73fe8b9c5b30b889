//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Account Requests
// ============================================================================

/// Account registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[validate(length(max = 32, message = "Phone number must be at most 32 characters"))]
    pub phone_number: Option<String>,

    #[validate(length(max = 32, message = "Gender must be at most 32 characters"))]
    pub gender: Option<String>,
}

/// Password login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

// ============================================================================
// OTP Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    pub otp: String,
}

// ============================================================================
// Password Change Requests
// ============================================================================

/// First step: prove ownership of the email address
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StartPasswordChangeRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Second step: set the new password
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}
