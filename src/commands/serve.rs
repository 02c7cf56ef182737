//! Serve command - Starts the HTTP server.

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};

/// Execute the serve command
pub async fn execute(args: ServeArgs, mut config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    if let Some(host) = args.host {
        config.server_host = host;
    }
    if let Some(port) = args.port {
        config.server_port = port;
    }

    // Open the file-backed stores
    let app_state = AppState::from_config(&config)?;
    tracing::info!("Stores loaded");

    // Build router
    let app = create_router(app_state);

    // Start server
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
