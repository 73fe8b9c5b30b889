//! Value objects - immutable types that represent domain concepts

mod claims;
mod refresh_ttl;
mod user_id;

pub use claims::{AccessClaims, CookieNames, OtpPurpose, TokenScope};
pub use refresh_ttl::RefreshTtl;
pub use user_id::{UserId, UserIdParseError};
