//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation (PostgreSQL, Redis or in-memory).
//!
//! A failing backend must surface as `Err`, never as `Ok(None)`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{OtpRecord, RefreshTokenRecord, User};
use crate::error::DomainError;
use crate::value_objects::UserId;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// List every user, oldest first
    async fn list(&self) -> RepoResult<Vec<User>>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Check if username is already taken
    async fn username_exists(&self, username: &str) -> RepoResult<bool>;

    /// Create a new user
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Flag the user's email as verified
    async fn set_authenticated(&self, id: UserId) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: UserId) -> RepoResult<Option<String>>;

    /// Update password hash
    async fn update_password(&self, id: UserId, password_hash: &str) -> RepoResult<()>;
}

// ============================================================================
// OTP Repository
// ============================================================================

#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Store a new one-time passcode
    async fn create(&self, record: &OtpRecord) -> RepoResult<()>;

    /// Find a passcode by email and hashed code
    async fn find(&self, email: &str, token_hash: &str) -> RepoResult<Option<OtpRecord>>;

    /// Delete a single passcode.
    ///
    /// Returns `true` only for the caller that actually removed the row.
    async fn delete(&self, email: &str, token_hash: &str) -> RepoResult<bool>;

    /// Delete every passcode issued to an email, returning how many were removed
    async fn delete_all_for_email(&self, email: &str) -> RepoResult<u64>;

    /// Remove passcodes whose expiry is before `cutoff`, returning how many
    /// were removed
    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> RepoResult<u64>;
}

// ============================================================================
// Refresh Token Repository
// ============================================================================

#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Persist a new record. Fails with `DuplicateTokenId` if the id exists.
    async fn insert(&self, record: &RefreshTokenRecord) -> RepoResult<()>;

    /// Find a record by its id
    async fn find(&self, id: &str) -> RepoResult<Option<RefreshTokenRecord>>;

    /// Delete a record.
    ///
    /// Of any number of concurrent calls for the same id, exactly one
    /// returns `true`.
    async fn delete(&self, id: &str) -> RepoResult<bool>;

    /// Remove records whose expiry is before `cutoff`, returning how many
    /// were removed. Backends that expire keys on their own return `0`.
    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> RepoResult<u64>;
}
