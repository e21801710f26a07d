use crate::config::Config;
use crate::db::Database;

/// Application state shared across all HTTP handlers.
///
/// Wrapped in `Arc` and handed to handlers through Axum's State extraction.
/// The configuration is built once at startup and never changes afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Configuration the process was started with
    pub config: Config,

    /// Verified connection pool, `None` when running without a database
    pub database: Option<Database>,
}

impl AppState {
    pub fn new(config: Config, database: Option<Database>) -> Self {
        Self { config, database }
    }
}
