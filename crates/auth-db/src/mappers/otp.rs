//! OTP entity <-> model mapper

use auth_core::OtpRecord;

use crate::models::OtpModel;

impl From<OtpModel> for OtpRecord {
    fn from(model: OtpModel) -> Self {
        OtpRecord {
            email: model.email,
            token_hash: model.token_hash,
            expires_at: model.expires_at,
            created_at: model.created_at,
        }
    }
}
