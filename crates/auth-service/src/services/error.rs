//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use auth_common::AppError;
use auth_core::{DomainError, TokenScope};
use std::fmt;

/// Why a session was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnauthorizedReason {
    /// No usable access token and no refresh token to fall back on
    MissingToken,
    /// Unknown refresh token, or another redemption consumed it first
    TokenNotFound,
    /// Refresh token past its expiry
    TokenExpired,
    /// Token minted for a different scope than the endpoint accepts
    ModeMismatch {
        expected: TokenScope,
        actual: TokenScope,
    },
}

impl fmt::Display for UnauthorizedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingToken => f.write_str("missing or invalid access token"),
            Self::TokenNotFound => f.write_str("token doesn't exist"),
            Self::TokenExpired => f.write_str("token expired"),
            Self::ModeMismatch { expected, actual } => {
                write!(f, "token issued for '{actual}' cannot be used for '{expected}'")
            }
        }
    }
}

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation
    Domain(DomainError),

    /// Application error (auth, validation, etc.)
    App(AppError),

    /// Session refused
    Unauthorized(UnauthorizedReason),

    /// Resource not found
    NotFound { resource: &'static str, id: String },

    /// Validation error
    Validation(String),

    /// Conflict (e.g., duplicate resource)
    Conflict(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::Unauthorized(reason) => write!(f, "Unauthorized: {reason}"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a not found error
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn mode_mismatch(expected: TokenScope, actual: TokenScope) -> Self {
        Self::Unauthorized(UnauthorizedReason::ModeMismatch { expected, actual })
    }

    /// The refusal reason, if this is an unauthorized error
    pub fn unauthorized_reason(&self) -> Option<&UnauthorizedReason> {
        match self {
            Self::Unauthorized(reason) => Some(reason),
            _ => None,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => {
                if e.is_not_found() {
                    404
                } else if e.is_validation() {
                    400
                } else if e.is_conflict() {
                    409
                } else {
                    500
                }
            }
            Self::App(e) => e.status_code(),
            Self::Unauthorized(_) => 401,
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::Unauthorized(reason) => AppError::Unauthorized(reason.to_string()),
            ServiceError::NotFound { resource, id } => {
                AppError::NotFound(format!("{resource} {id}"))
            }
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::Conflict(msg) => AppError::Conflict(msg),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = ServiceError::not_found("User", "123");
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(err.to_string().contains("User not found: 123"));
    }

    #[test]
    fn test_unauthorized_messages() {
        assert_eq!(
            UnauthorizedReason::MissingToken.to_string(),
            "missing or invalid access token"
        );
        assert_eq!(
            UnauthorizedReason::TokenNotFound.to_string(),
            "token doesn't exist"
        );
        assert_eq!(UnauthorizedReason::TokenExpired.to_string(), "token expired");

        let err = ServiceError::mode_mismatch(TokenScope::ChangePassword, TokenScope::Otp);
        assert_eq!(err.status_code(), 401);
        assert!(err.to_string().contains("'otp'"));
        assert!(err.to_string().contains("'change_password'"));
    }

    #[test]
    fn test_validation_error() {
        let err = ServiceError::validation("Invalid email format");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_domain_conflict_status() {
        let err = ServiceError::from(DomainError::EmailAlreadyExists);
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn test_convert_to_app_error() {
        let app_err: AppError = ServiceError::Unauthorized(UnauthorizedReason::TokenExpired).into();
        assert_eq!(app_err.status_code(), 401);
        assert!(app_err.to_string().contains("token expired"));

        let app_err: AppError = ServiceError::not_found("User", "456").into();
        assert_eq!(app_err.status_code(), 404);
    }
}
