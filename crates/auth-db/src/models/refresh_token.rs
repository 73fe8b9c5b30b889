//! Refresh token database model

use auth_core::AccessClaims;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

/// Database model for refresh_tokens table
#[derive(Debug, Clone, FromRow)]
pub struct RefreshTokenModel {
    pub id: String,
    pub claims: Json<AccessClaims>,
    pub expires_at: DateTime<Utc>,
    pub valid_days: f64,
    pub created_at: DateTime<Utc>,
}
