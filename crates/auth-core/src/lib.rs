//! # auth-core
//!
//! Domain layer containing entities, value objects and repository traits for the
//! authentication backend. This crate has zero dependencies on infrastructure
//! (database, web framework, token signing, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{OtpRecord, RefreshTokenRecord, User, UserProfile};
pub use error::DomainError;
pub use traits::{OtpRepository, RefreshTokenRepository, RepoResult, UserRepository};
pub use value_objects::{
    AccessClaims, CookieNames, OtpPurpose, RefreshTtl, TokenScope, UserId, UserIdParseError,
};
