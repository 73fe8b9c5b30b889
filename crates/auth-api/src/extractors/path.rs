//! Path parameter extractors

use auth_core::UserId;
use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::Deserialize;

use crate::response::ApiError;

#[derive(Debug, Deserialize)]
struct UserIdParams {
    user_id: String,
}

/// `:user_id` parsed as a [`UserId`]
#[derive(Debug, Clone, Copy)]
pub struct UserIdPath(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for UserIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<UserIdParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        params
            .user_id
            .parse()
            .map(UserIdPath)
            .map_err(|_| ApiError::invalid_path("Invalid user_id format"))
    }
}
