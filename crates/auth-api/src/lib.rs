//! # auth-api
//!
//! REST API server built with Axum framework.

pub mod cookies;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run, run_server, spawn_purge_task};
pub use state::AppState;
