//! Server setup and initialization
//!
//! Provides the application builder, backend wiring and the server runner.

use std::sync::Arc;
use std::time::Duration;

use auth_cache::{RedisPool, RedisRefreshTokenRepository};
use auth_common::{
    AppConfig, AppError, OtpHasher, RefreshTokenBackend, StorageBackend, TokenCodec,
};
use auth_core::{OtpRepository, RefreshTokenRepository, UserRepository};
use auth_db::{
    create_pool, run_migrations, MemoryOtpRepository, MemoryRefreshTokenRepository,
    MemoryUserRepository, PgOtpRepository, PgPool, PgRefreshTokenRepository, PgUserRepository,
};
use auth_service::{build_mailer, OtpService, ServiceContextBuilder, ServiceSettings, TokenPolicy};
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::middleware::{apply_middleware, apply_rate_limit};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Interval between purges of expired refresh tokens and OTPs
pub const PURGE_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Build the complete Axum application with all routes and middleware
///
/// Health probes are not rate limited.
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let api = apply_rate_limit(create_router(), &config.rate_limit)?;
    let router = apply_middleware(
        api.merge(health_routes()),
        &config.cors,
        config.app.env.is_production(),
    );
    Ok(router.with_state(state))
}

struct Storage {
    user_repo: Arc<dyn UserRepository>,
    otp_repo: Arc<dyn OtpRepository>,
    refresh_token_repo: Arc<dyn RefreshTokenRepository>,
    pg_pool: Option<PgPool>,
}

async fn connect_storage(config: &AppConfig) -> Result<Storage, AppError> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            let db_config = config
                .database
                .as_ref()
                .ok_or_else(|| AppError::Config("DATABASE_URL is not set".to_string()))?;

            info!("Connecting to PostgreSQL...");
            let pool = create_pool(db_config)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            run_migrations(&pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            info!("PostgreSQL connection established");

            Ok(Storage {
                user_repo: Arc::new(PgUserRepository::new(pool.clone())),
                otp_repo: Arc::new(PgOtpRepository::new(pool.clone())),
                refresh_token_repo: Arc::new(PgRefreshTokenRepository::new(pool.clone())),
                pg_pool: Some(pool),
            })
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; all data is lost on restart");
            Ok(Storage {
                user_repo: Arc::new(MemoryUserRepository::new()),
                otp_repo: Arc::new(MemoryOtpRepository::new()),
                refresh_token_repo: Arc::new(MemoryRefreshTokenRepository::new()),
                pg_pool: None,
            })
        }
    }
}

async fn connect_redis(config: &AppConfig) -> Result<RedisPool, AppError> {
    let redis_config = config
        .redis
        .as_ref()
        .ok_or_else(|| AppError::Config("REDIS_URL is not set".to_string()))?;

    info!("Connecting to Redis...");
    let pool =
        RedisPool::from_config(redis_config).map_err(|e| AppError::Cache(e.to_string()))?;
    pool.health_check()
        .await
        .map_err(|e| AppError::Cache(e.to_string()))?;
    info!("Redis connection established");

    Ok(pool)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let storage = connect_storage(&config).await?;

    let (refresh_token_repo, redis_pool): (Arc<dyn RefreshTokenRepository>, Option<RedisPool>) =
        match config.storage.refresh_tokens {
            RefreshTokenBackend::Database => (storage.refresh_token_repo, None),
            RefreshTokenBackend::Redis => {
                let pool = connect_redis(&config).await?;
                (
                    Arc::new(RedisRefreshTokenRepository::new(pool.clone())),
                    Some(pool),
                )
            }
        };

    let mailer = build_mailer(&config.mail).map_err(|e| AppError::Config(e.to_string()))?;
    let otp_hasher =
        OtpHasher::new(&config.otp.secret).map_err(|e| AppError::Config(e.to_string()))?;

    let service_context = ServiceContextBuilder::new()
        .user_repo(storage.user_repo)
        .otp_repo(storage.otp_repo)
        .refresh_token_repo(refresh_token_repo)
        .codec(TokenCodec::from_config(&config.jwt))
        .token_policy(TokenPolicy::from(&config.tokens))
        .otp_hasher(otp_hasher)
        .mailer(mailer)
        .settings(ServiceSettings::from_config(&config))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    let mut state = AppState::new(service_context, config);
    if let Some(pool) = storage.pg_pool {
        state = state.with_pg_pool(pool);
    }
    if let Some(pool) = redis_pool {
        state = state.with_redis_pool(pool);
    }
    Ok(state)
}

/// Periodically drop refresh records well past their expiry and expired OTPs
pub fn spawn_purge_task(state: AppState, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);

        loop {
            interval.tick().await;
            match state.tokens().purge_expired().await {
                Ok(count) if count > 0 => info!(count, "Purged expired refresh tokens"),
                Ok(_) => {}
                Err(e) => error!(error = %e, "Failed to purge expired refresh tokens"),
            }
            match OtpService::new(state.service_context()).purge_expired().await {
                Ok(count) if count > 0 => info!(count, "Purged expired OTPs"),
                Ok(_) => {}
                Err(e) => error!(error = %e, "Failed to purge expired OTPs"),
            }
        }
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}

/// Run the HTTP server on an already bound listener
pub async fn run_server(app: Router, listener: TcpListener) -> Result<(), AppError> {
    if let Ok(addr) = listener.local_addr() {
        info!("Server listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();

    let state = create_app_state(config).await?;
    let purge = spawn_purge_task(state.clone(), PURGE_INTERVAL);
    let app = create_app(state)?;

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    let result = run_server(app, listener).await;
    purge.abort();
    result
}
