//! User entity <-> model mapper

use auth_core::{User, UserId, UserProfile};
use uuid::Uuid;

use crate::models::UserModel;

/// Convert UserModel to User entity. The password hash stays behind.
impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: UserId::from_uuid(model.id),
            email: model.email,
            username: model.username,
            authenticated: model.authenticated,
            profile: UserProfile {
                first_name: model.first_name,
                last_name: model.last_name,
                phone_number: model.phone_number,
                gender: model.gender,
                image: model.image,
            },
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Borrowed column values for inserting a user
pub struct UserInsert<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub authenticated: bool,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone_number: Option<&'a str>,
    pub gender: Option<&'a str>,
    pub image: Option<&'a str>,
}

impl<'a> UserInsert<'a> {
    pub fn new(user: &'a User, password_hash: &'a str) -> Self {
        Self {
            id: user.id.into_inner(),
            email: &user.email,
            username: &user.username,
            password_hash,
            authenticated: user.authenticated,
            first_name: &user.profile.first_name,
            last_name: &user.profile.last_name,
            phone_number: user.profile.phone_number.as_deref(),
            gender: user.profile.gender.as_deref(),
            image: user.profile.image.as_deref(),
        }
    }
}
