//! Route definitions
//!
//! All API routes are mounted under /api; health probes sit at the root.

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::handlers::{auth, health, otp, password, token, users};
use crate::state::AppState;

/// Create the main API router (health probes are added separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api", api_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(account_routes())
        .merge(token_routes())
        .merge(otp_routes())
        .merge(password_routes())
        .merge(user_routes())
}

/// Signup and login
fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
}

/// Session validation and token inspection
fn token_routes() -> Router<AppState> {
    Router::new()
        .route("/token/validate", post(token::validate))
        .route("/validate-token", post(token::validate))
        .route("/token/decode", post(token::decode))
}

fn otp_routes() -> Router<AppState> {
    Router::new()
        .route("/otp/create", post(otp::create))
        .route("/otp/verify", post(otp::verify))
}

fn password_routes() -> Router<AppState> {
    Router::new()
        .route("/change-password/verify", post(password::start))
        .route("/change-password/change", patch(password::change))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users))
        .route("/users/:user_id", get(users::get_user))
}
