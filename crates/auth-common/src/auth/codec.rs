//! Access token codec
//!
//! Signs and verifies short-lived HS256 JWTs carrying [`AccessClaims`]. The
//! codec is stateless and never consults a store: a verified token is trusted
//! on its own until it expires.

use auth_core::AccessClaims;
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::error::AppError;

/// Wire form of an access token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedClaims {
    #[serde(flatten)]
    pub claims: AccessClaims,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Reason an access token did not verify
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("invalid signature")]
    BadSignature,

    #[error("malformed token: {0}")]
    Malformed(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::BadSignature,
            _ => Self::Malformed(err.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Create a codec signing with the given shared secret
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    #[must_use]
    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(&config.secret)
    }

    /// Sign claims into an access token valid for `ttl_seconds`
    ///
    /// # Errors
    /// Returns an internal error if the expiry overflows or encoding fails
    pub fn sign(&self, claims: &AccessClaims, ttl_seconds: i64) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let exp = now.checked_add(ttl_seconds).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("Access token ttl {ttl_seconds}s overflows"))
        })?;
        let payload = SignedClaims {
            claims: claims.clone(),
            iat: now,
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode JWT: {e}")))
    }

    /// Verify signature and expiry, returning the embedded claims
    ///
    /// # Errors
    /// Returns the reason the token is not acceptable
    pub fn verify(&self, token: &str) -> Result<AccessClaims, TokenError> {
        decode::<SignedClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.claims)
            .map_err(TokenError::from)
    }

    /// Read a token payload without checking its signature or expiry
    ///
    /// # Errors
    /// Returns `Malformed` if the token cannot be parsed at all
    pub fn decode_unverified(&self, token: &str) -> Result<serde_json::Value, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<serde_json::Value>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(TokenError::from)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth_core::{OtpPurpose, UserId};

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret-key-that-is-long-enough")
    }

    fn app_claims() -> AccessClaims {
        AccessClaims::AppAccess {
            user_id: UserId::new(),
            username: "jane.doe".to_string(),
        }
    }

    #[test]
    fn test_sign_and_verify() {
        let codec = codec();
        let claims = app_claims();

        let token = codec.sign(&claims, 300).unwrap();
        assert_eq!(codec.verify(&token).unwrap(), claims);
    }

    #[test]
    fn test_otp_claims_survive_signing() {
        let codec = codec();
        let claims = AccessClaims::OtpAccess {
            user_id: UserId::new(),
            email: "jane@example.com".to_string(),
            mode: OtpPurpose::ChangePassword,
        };

        let token = codec.sign(&claims, 300).unwrap();
        assert_eq!(codec.verify(&token).unwrap(), claims);
    }

    #[test]
    fn test_expired_token() {
        let codec = codec();
        let token = codec.sign(&app_claims(), -10).unwrap();

        assert_eq!(codec.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_secret() {
        let token = codec().sign(&app_claims(), 300).unwrap();
        let other = TokenCodec::new("a-completely-different-secret-value");

        assert_eq!(other.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_malformed_token() {
        let result = codec().verify("invalid.token.here");
        assert!(matches!(result, Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_decode_unverified_ignores_signature_and_expiry() {
        let token = codec().sign(&app_claims(), -10).unwrap();
        let other = TokenCodec::new("a-completely-different-secret-value");

        let payload = other.decode_unverified(&token).unwrap();
        assert_eq!(payload["type"], "access_app");
        assert_eq!(payload["username"], "jane.doe");
    }

    #[test]
    fn test_sign_rejects_overflowing_ttl() {
        let err = codec().sign(&app_claims(), i64::MAX).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
