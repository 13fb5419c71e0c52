//! Items API server entry point.

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};

use items_api::api::{cors_layer, create_router, AppState};
use items_api::config::{Config, LogFormat};
use items_api::store::ItemStore;
use items_api::utils::shutdown_signal;
use items_api::{db, logging, metrics, AppError, Result};

/// Item list/create HTTP backend.
#[derive(Parser, Debug)]
#[command(name = "items-api")]
#[command(about = "HTTP backend for listing and creating items")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format override (pretty or json).
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// Bind address override.
        #[arg(long)]
        host: Option<String>,

        /// HTTP server port override.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Apply database migrations and exit.
    Migrate,

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Configuration is needed before logging so the format can be chosen
    let loaded = Config::load();
    let (default_filter, config_format) = match &loaded {
        Ok(c) => (c.rust_log.clone(), c.log_format),
        Err(_) => ("info".to_string(), LogFormat::default()),
    };
    logging::init(
        args.verbose,
        &default_filter,
        args.log_format.unwrap_or(config_format),
    );

    let mut config = loaded.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let result = match args.command {
        Some(Command::CheckConfig) => cmd_check_config(&config),
        Some(Command::Migrate) => cmd_migrate(&config).await,
        Some(Command::Serve { host, port }) => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            cmd_serve(config).await
        }
        None => cmd_serve(config).await,
    };

    Ok(result?)
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> Result<()> {
    println!("======================================================================");
    println!("ITEMS API - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(AppError::InvalidConfig(e));
        }
    }

    let origins = config.cors_origins();
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Database URL: {}", config.database_url);
    println!("  Max Connections: {}", config.database_max_connections);
    println!("  Bind Address: {}", config.bind_addr());
    println!(
        "  CORS Origins: {}",
        if origins.is_empty() { "any".to_string() } else { origins.join(", ") }
    );
    println!("  Log Filter: {}", config.rust_log);
    println!("  Log Format: {}", config.log_format);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Apply migrations and exit.
async fn cmd_migrate(config: &Config) -> Result<()> {
    validate(config)?;

    let pool = db::connect(config).await?;
    db::migrate(&pool).await?;
    pool.close().await;

    info!("Migrations complete");
    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(config: Config) -> Result<()> {
    validate(&config)?;

    info!("Configuration loaded successfully");
    info!("Database: {}", config.database_url);

    let metrics_handle = metrics::init_metrics()?;

    let pool = db::connect(&config).await?;
    db::migrate(&pool).await?;

    let app_state = AppState::new(ItemStore::new(pool.clone()), metrics_handle);
    let router = create_router(app_state).layer(cors_layer(&config));

    // Start HTTP server
    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}

fn validate(config: &Config) -> Result<()> {
    config.ensure_valid().map_err(|e| {
        error!("{}", e);
        e
    })
}
