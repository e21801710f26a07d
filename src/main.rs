use clap::{Parser, Subcommand};
use greenlight::admin::{self, AdminCommands};
use greenlight::config::{Config, Environment};
use greenlight::error::AppResult;
use greenlight::server;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// greenlight - A JSON API for a movie catalog
#[derive(Parser, Debug)]
#[command(name = "greenlight")]
#[command(version)]
#[command(about = "A JSON API for a movie catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Command-line overrides for the database settings
#[derive(clap::Args, Debug, Default)]
struct DbArgs {
    /// PostgreSQL DSN (overrides DATABASE_URL)
    #[arg(long)]
    db_dsn: Option<String>,

    /// PostgreSQL max open connections (overrides DB_MAX_OPEN_CONNS)
    #[arg(long)]
    db_max_open_conns: Option<u32>,

    /// PostgreSQL max idle connections (overrides DB_MAX_IDLE_CONNS)
    #[arg(long)]
    db_max_idle_conns: Option<u32>,

    /// PostgreSQL max connection idle time, e.g. 15m (overrides DB_MAX_IDLE_TIME)
    #[arg(long)]
    db_max_idle_time: Option<String>,
}

impl DbArgs {
    fn apply(self, config: &mut Config) {
        if let Some(dsn) = self.db_dsn {
            config.database.dsn = dsn;
        }
        if let Some(n) = self.db_max_open_conns {
            config.database.max_open_conns = n;
        }
        if let Some(n) = self.db_max_idle_conns {
            config.database.max_idle_conns = n;
        }
        if let Some(idle) = self.db_max_idle_time {
            config.database.max_idle_time = idle;
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web server
    Server {
        /// Host to bind to (overrides SERVER_HOST env var)
        #[arg(long)]
        host: Option<String>,

        /// API server port (overrides SERVER_PORT env var)
        #[arg(long)]
        port: Option<u16>,

        /// Environment (overrides APP_ENV env var)
        #[arg(long, value_enum)]
        env: Option<Environment>,

        #[command(flatten)]
        db: DbArgs,
    },

    /// Administrative commands
    Admin {
        #[command(flatten)]
        db: DbArgs,

        #[command(subcommand)]
        admin_command: AdminCommands,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let mut config = Config::load()?;

    match cli.command {
        Commands::Server {
            host,
            port,
            env,
            db,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(env) = env {
                config.server.env = env;
            }
            db.apply(&mut config);
            config.validate()?;

            server::run_server(config).await
        }
        Commands::Admin { db, admin_command } => {
            db.apply(&mut config);
            config.validate()?;

            admin::run(config, admin_command).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing();

    if let Err(e) = run(cli).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
