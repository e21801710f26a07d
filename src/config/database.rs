use serde::Deserialize;

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string
    pub dsn: String,

    /// Maximum number of open connections (0 means unbounded)
    pub max_open_conns: u32,

    /// Maximum number of idle connections kept in the pool
    pub max_idle_conns: u32,

    /// How long a connection may sit idle before it is closed, e.g. "15m"
    pub max_idle_time: String,
}

impl DatabaseConfig {
    /// Validate database configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.dsn.trim().is_empty() {
            return Err("DATABASE_URL must not be empty".to_string());
        }

        Ok(())
    }
}
