//! Authentication utilities

mod codec;
mod otp;
mod password;

pub use codec::{SignedClaims, TokenCodec, TokenError};
pub use otp::{generate_otp_code, generate_otp_code_with, OtpHasher, OTP_LENGTH};
pub use password::{
    hash_password, validate_password_strength, verify_password, PasswordService,
};
