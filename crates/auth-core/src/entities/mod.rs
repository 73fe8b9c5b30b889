//! Domain entities - core business objects

mod otp;
mod refresh_token;
mod user;

pub use otp::OtpRecord;
pub use refresh_token::RefreshTokenRecord;
pub use user::{User, UserProfile};
