//! User entity - represents a registered account

use chrono::{DateTime, Utc};

use crate::value_objects::UserId;

/// Public profile details shown to other users
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub image: Option<String>,
}

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    /// Set once the email address has been verified through an OTP
    pub authenticated: bool,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new, unverified user with required fields
    pub fn new(
        id: UserId,
        email: String,
        username: String,
        first_name: String,
        last_name: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            username,
            authenticated: false,
            profile: UserProfile {
                first_name,
                last_name,
                ..UserProfile::default()
            },
            created_at: now,
            updated_at: now,
        }
    }

    /// Full display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.profile.first_name, self.profile.last_name)
    }

    /// Mark the email address as verified. Returns `true` if the flag changed.
    pub fn mark_authenticated(&mut self) -> bool {
        if self.authenticated {
            return false;
        }
        self.authenticated = true;
        self.updated_at = Utc::now();
        true
    }
}
