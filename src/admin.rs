//! Administrative command handlers.

use crate::config::Config;
use crate::db::{open_db, PoolConfiguration};
use crate::error::AppResult;
use clap::Subcommand;
use tracing::info;

/// Administrative commands available via CLI.
#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// Open the connection pool and verify the database answers
    PingDb,
}

/// Run an administrative command with the given configuration.
pub async fn run(config: Config, admin_command: AdminCommands) -> AppResult<()> {
    match admin_command {
        AdminCommands::PingDb => ping_db(config).await,
    }
}

/// Run the startup pool checks without serving traffic.
async fn ping_db(config: Config) -> AppResult<()> {
    info!("Pinging database...");

    let database = open_db(&PoolConfiguration::from(&config.database)).await?;
    let limits = database.limits;
    database.close().await;

    println!("\n=== Database ===");
    println!("Status:          reachable");
    println!(
        "Max open conns:  {}",
        limits
            .max_open
            .map_or_else(|| "unbounded".to_string(), |n| n.to_string())
    );
    println!("Max idle conns:  {}", limits.max_idle);
    println!(
        "Max idle time:   {}",
        limits
            .idle_timeout
            .map_or_else(|| "none".to_string(), |d| format!("{:?}", d))
    );
    println!();

    Ok(())
}
