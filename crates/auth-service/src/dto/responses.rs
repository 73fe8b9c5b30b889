//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use auth_core::{AccessClaims, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::tokens::TokenPair;

// ============================================================================
// Common Response Types
// ============================================================================

/// Plain confirmation message
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Auth Responses
// ============================================================================

/// Token pair handed back after signup, login or an OTP exchange
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// `false` when the pair only unlocks the OTP flow
    pub verified: bool,
}

impl AuthResponse {
    pub fn new(pair: &TokenPair, verified: bool) -> Self {
        Self {
            message: None,
            access_token: pair.access_token.clone(),
            refresh_token: pair.refresh_token.clone(),
            username: None,
            image: None,
            verified,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Result of validating an app session
#[derive(Debug, Clone, Serialize)]
pub struct TokenValidationResponse {
    /// Present when the refresh token was rotated
    pub tokens: Option<TokenPair>,
    pub data: AccessClaims,
}

#[derive(Debug, Clone, Serialize)]
pub struct DecodedTokenResponse {
    pub decoded_token: Option<serde_json::Value>,
}

// ============================================================================
// User Responses
// ============================================================================

/// Public profile of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfileResponse {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

// ============================================================================
// Health Check Responses
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backend
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub storage: String,
    pub refresh_tokens: String,
}

fn health_label(healthy: bool) -> String {
    if healthy { "healthy" } else { "unhealthy" }.to_string()
}

impl ReadinessResponse {
    pub fn ready(storage_healthy: bool, refresh_tokens_healthy: bool) -> Self {
        let all_healthy = storage_healthy && refresh_tokens_healthy;
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                storage: health_label(storage_healthy),
                refresh_tokens: health_label(refresh_tokens_healthy),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
