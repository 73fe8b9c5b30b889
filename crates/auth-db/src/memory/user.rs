//! In-memory implementation of UserRepository

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;

use auth_core::{DomainError, RepoResult, User, UserId, UserRepository};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

/// A single lock guards the whole table so uniqueness checks and inserts
/// happen atomically.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<UserId, StoredUser>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self.users.read().get(&id).map(|s| s.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|s| s.user.email == email)
            .map(|s| s.user.clone()))
    }

    async fn list(&self) -> RepoResult<Vec<User>> {
        let mut users: Vec<User> = self.users.read().values().map(|s| s.user.clone()).collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.users.read().values().any(|s| s.user.email == email))
    }

    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        Ok(self.users.read().values().any(|s| s.user.username == username))
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        let mut users = self.users.write();

        if users.values().any(|s| s.user.email == user.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        if users.values().any(|s| s.user.username == user.username) {
            return Err(DomainError::UsernameTaken(user.username.clone()));
        }

        users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(())
    }

    async fn set_authenticated(&self, id: UserId) -> RepoResult<()> {
        let mut users = self.users.write();
        let stored = users.get_mut(&id).ok_or(DomainError::UserNotFound(id))?;
        stored.user.authenticated = true;
        stored.user.updated_at = Utc::now();
        Ok(())
    }

    async fn get_password_hash(&self, id: UserId) -> RepoResult<Option<String>> {
        Ok(self.users.read().get(&id).map(|s| s.password_hash.clone()))
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> RepoResult<()> {
        let mut users = self.users.write();
        let stored = users.get_mut(&id).ok_or(DomainError::UserNotFound(id))?;
        stored.password_hash = password_hash.to_string();
        stored.user.updated_at = Utc::now();
        Ok(())
    }
}
