//! Database models - one struct per table row

mod otp;
mod refresh_token;
mod user;

pub use otp::OtpModel;
pub use refresh_token::RefreshTokenModel;
pub use user::UserModel;
