//! User service
//!
//! Read-only access to public user profiles.

use auth_core::UserId;
use tracing::instrument;

use crate::dto::UserProfileResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Every user, oldest first
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> ServiceResult<Vec<UserProfileResponse>> {
        let users = self.ctx.user_repo().list().await?;
        Ok(users.iter().map(UserProfileResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: UserId) -> ServiceResult<UserProfileResponse> {
        self.ctx
            .user_repo()
            .find_by_id(id)
            .await?
            .map(|user| UserProfileResponse::from(&user))
            .ok_or_else(|| ServiceError::not_found("User", id.to_string()))
    }
}
