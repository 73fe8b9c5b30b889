//! Service layer - business logic orchestration
//!
//! Each service borrows the shared [`ServiceContext`] and exposes one use
//! case per method.

mod auth;
mod context;
mod error;
mod otp;
mod user;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{normalize_email, AuthOutcome, AuthService};
pub use context::{ServiceContext, ServiceContextBuilder, ServiceSettings};
pub use error::{ServiceError, ServiceResult, UnauthorizedReason};
pub use otp::{OtpService, OtpVerification};
pub use user::UserService;
