//! Auth API Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p auth-api
//! ```
//!
//! Configuration is loaded from environment variables or a `.env` file.

use auth_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Configuration decides the log format, so it is loaded first
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.api.address(),
        storage = ?config.storage.backend,
        refresh_tokens = ?config.storage.refresh_tokens,
        "Configuration loaded"
    );

    if let Err(e) = auth_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
