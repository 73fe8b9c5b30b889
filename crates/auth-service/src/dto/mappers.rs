//! Entity to DTO conversions

use auth_core::User;

use super::responses::{AuthResponse, UserProfileResponse};
use crate::services::AuthOutcome;

impl From<&User> for UserProfileResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.profile.first_name.clone(),
            last_name: user.profile.last_name.clone(),
            phone_number: user.profile.phone_number.clone(),
            gender: user.profile.gender.clone(),
            image: user.profile.image.clone(),
        }
    }
}

impl From<&AuthOutcome> for AuthResponse {
    fn from(outcome: &AuthOutcome) -> Self {
        let mut response = Self::new(&outcome.pair, outcome.verified);
        if outcome.verified {
            response.username = Some(outcome.user.username.clone());
            response.image.clone_from(&outcome.user.profile.image);
        } else {
            response.message = Some("Unverified email address".to_string());
        }
        response
    }
}
