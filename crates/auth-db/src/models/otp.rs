//! OTP database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for otps table
#[derive(Debug, Clone, FromRow)]
pub struct OtpModel {
    pub id: i64,
    pub email: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
