//! Refresh token entity <-> model mapper

use auth_core::RefreshTokenRecord;

use crate::models::RefreshTokenModel;

impl From<RefreshTokenModel> for RefreshTokenRecord {
    fn from(model: RefreshTokenModel) -> Self {
        RefreshTokenRecord {
            id: model.id,
            claims: model.claims.0,
            expires_at: model.expires_at,
            valid_days: model.valid_days,
            created_at: model.created_at,
        }
    }
}
