//! One-time passcode generation and hashing
//!
//! Codes are six decimal digits with a non-zero leading digit. Only an
//! HMAC-SHA256 of the code is persisted, so the same code always hashes to the
//! same lookup key under one server secret.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

use crate::config::ConfigError;

/// Number of digits in a generated code
pub const OTP_LENGTH: usize = 6;

type HmacSha256 = Hmac<Sha256>;

/// Generate a code using the thread-local RNG
pub fn generate_otp_code() -> String {
    generate_otp_code_with(&mut rand::thread_rng())
}

/// Generate a code from the given RNG. Each digit is drawn independently.
pub fn generate_otp_code_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut code = String::with_capacity(OTP_LENGTH);
    code.push(char::from(b'0' + rng.gen_range(1..=9u8)));
    for _ in 1..OTP_LENGTH {
        code.push(char::from(b'0' + rng.gen_range(0..=9u8)));
    }
    code
}

/// Keyed hash for storing codes at rest
#[derive(Clone)]
pub struct OtpHasher {
    mac: HmacSha256,
}

impl OtpHasher {
    /// Key the hasher with the server secret
    ///
    /// # Errors
    /// Returns an error if the secret is rejected as an HMAC key
    pub fn new(secret: &str) -> Result<Self, ConfigError> {
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| ConfigError::InvalidValue("OTP_SECRET", e.to_string()))?;
        Ok(Self { mac })
    }

    /// Lowercase hex HMAC-SHA256 of the code
    pub fn hash(&self, code: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(code.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

impl std::fmt::Debug for OtpHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpHasher").finish_non_exhaustive()
    }
}
