mod database;
mod server;

pub use database::DatabaseConfig;
pub use server::{Environment, ServerConfig};

use crate::db::PoolConfiguration;
use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::str::FromStr;

/// Env file read on startup before falling back to `.env`.
pub const CONFIG_FILE: &str = "config.env";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

impl Config {
    /// Load and validate configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables without validating it.
    ///
    /// `config.env` and `.env` are read first when present; variables already
    /// set in the process take precedence.
    pub fn load() -> AppResult<Self> {
        dotenvy::from_filename(CONFIG_FILE).ok();
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an env file, falling back to the process environment.
    pub fn from_env_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let vars = dotenvy::from_path_iter(path)
            .map_err(|e| {
                AppError::Configuration(format!("Cannot read {}: {}", path.display(), e))
            })?
            .collect::<Result<HashMap<String, String>, _>>()
            .map_err(|e| {
                AppError::Configuration(format!("Cannot parse {}: {}", path.display(), e))
            })?;

        let config =
            Self::from_lookup(|key| vars.get(key).cloned().or_else(|| env::var(key).ok()))?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_var(&lookup, "SERVER_PORT", 4000)?;
        let env = match lookup("APP_ENV") {
            Some(raw) => Environment::from_str(&raw).map_err(AppError::Configuration)?,
            None => Environment::default(),
        };

        let dsn = lookup("DATABASE_URL")
            .or_else(|| lookup("GREENLIGHT_DB_DSN"))
            .unwrap_or_default();
        let max_open_conns = parse_var(&lookup, "DB_MAX_OPEN_CONNS", 25)?;
        let max_idle_conns = parse_var(&lookup, "DB_MAX_IDLE_CONNS", 25)?;
        let max_idle_time = lookup("DB_MAX_IDLE_TIME").unwrap_or_else(|| "15m".to_string());

        Ok(Config {
            server: ServerConfig { host, port, env },
            database: DatabaseConfig {
                dsn,
                max_open_conns,
                max_idle_conns,
                max_idle_time,
            },
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> AppResult<()> {
        if self.database.dsn.is_empty() {
            return Err(AppError::MissingEnvVar("DATABASE_URL".to_string()));
        }

        self.database.validate().map_err(AppError::Configuration)?;

        // Same interpretation the pool initializer applies at startup.
        PoolConfiguration::from(&self.database).limits()?;

        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}", key))),
        None => Ok(default),
    }
}
