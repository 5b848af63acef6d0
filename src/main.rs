use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sixc_assessment::{
    config::Config,
    email::EmailClient,
    server::{self, AppState},
    storage::{SqliteStorage, Storage},
};

/// 6C learning-style assessment server
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Port to listen on, overriding PORT
    #[arg(long)]
    port: Option<u16>,

    /// SQLite database path, overriding DATABASE_PATH
    #[arg(long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(database) = cli.database {
        config.database.path = database;
    }

    // Initialize logging
    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "6C Assessment Server starting..."
    );

    // Initialize storage
    let storage = match SqliteStorage::new(&config.database).await {
        Ok(s) => {
            info!(path = %config.database.path.display(), "Database initialized");
            s
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize database");
            return Err(e.into());
        }
    };

    // Initialize email gateway client
    let email = match EmailClient::new(&config.email, config.request.clone()) {
        Ok(c) => {
            info!(base_url = %config.email.base_url, "Email client initialized");
            c
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize email client");
            return Err(e.into());
        }
    };

    // Sweep expired progress sessions in the background
    let sweep_interval = Duration::from_secs(config.retention.sweep_interval_secs);
    let sweep_storage = storage.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        loop {
            interval.tick().await;
            match sweep_storage.purge_expired_progress().await {
                Ok(0) => {}
                Ok(purged) => info!(purged, "Purged expired progress sessions"),
                Err(e) => warn!(error = %e, "Progress sweep failed"),
            }
        }
    });

    // Create application state and serve
    let state = Arc::new(AppState::new(config, storage, email));

    if let Err(e) = server::serve(state).await {
        error!(error = %e, "Server error");
        return Err(e);
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        sixc_assessment::config::LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        sixc_assessment::config::LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
