//! Health check handlers
//!
//! Endpoints for liveness and readiness probes.

use axum::{extract::State, http::StatusCode, Json};
use auth_service::dto::{HealthResponse, ReadinessResponse};

use crate::state::AppState;

/// Basic health check (liveness probe)
///
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Readiness check with backend health
///
/// In-process backends are always ready.
///
/// GET /health/ready
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let storage_healthy = match state.pg_pool() {
        Some(pool) => auth_db::ping(pool).await.is_ok(),
        None => true,
    };

    let refresh_tokens_healthy = match state.redis_pool() {
        Some(pool) => pool.health_check().await.is_ok(),
        None => storage_healthy,
    };

    let response = ReadinessResponse::ready(storage_healthy, refresh_tokens_healthy);
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
