//! Server startup and shutdown.
//!
//! `run_server` opens and verifies the database pool before anything else;
//! the listener is only bound once the pool is ready. The pool is closed
//! after the server has drained.

use crate::config::Config;
use crate::db::{open_db, PoolConfiguration};
use crate::error::{AppError, AppResult};
use crate::routes;
use crate::state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Run the web server with the given configuration.
///
/// # Errors
///
/// This function will return an error if:
/// - The connection string is invalid
/// - The idle timeout cannot be parsed
/// - The database does not answer the startup ping
/// - Server binding fails
/// - Server runtime error occurs
pub async fn run_server(config: Config) -> AppResult<()> {
    info!("Starting greenlight server...");

    info!("Connecting to database...");
    let database = open_db(&PoolConfiguration::from(&config.database)).await?;

    let addr = config.server.addr();
    let env = config.server.env;
    let state = Arc::new(AppState::new(config, Some(database.clone())));
    let app = routes::create_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to address {}: {}", addr, e)))?;

    info!("Starting {} server on {}", env, addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(create_shutdown_signal())
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)));

    database.close().await;
    info!("Database connection pool closed");

    served?;
    info!("Server shutdown complete");
    Ok(())
}

/// Create a future that resolves when a shutdown signal is received.
///
/// On Unix-like systems, this listens for both Ctrl+C (SIGINT) and SIGTERM.
/// On other platforms, it only listens for Ctrl+C.
///
/// # Panics
///
/// Panics if signal handler installation fails. Without a handler the OS
/// cannot deliver shutdown signals, so graceful shutdown is impossible.
async fn create_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    #[cfg(not(unix))]
    ctrl_c.await;

    info!("Shutdown signal received");
}
