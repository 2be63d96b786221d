//! Player relay service entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use player_relay::api::routes::ENDPOINTS;
use player_relay::api::{create_router, AppState};
use player_relay::config::{Config, LogFormat};
use player_relay::metrics;
use player_relay::utils::shutdown_signal;

/// Relays game-server player snapshots to a web page.
#[derive(Parser, Debug)]
#[command(name = "player-relay")]
#[command(about = "Holds the latest player-list snapshot and serves it with a freshness window")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory holding index.html and static assets (overrides STATIC_DIR).
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the relay server (default).
    Serve,

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load()?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(dir) = args.static_dir.clone() {
        config.static_dir = dir;
    }

    init_logging(&config, args.verbose);

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(&config),
        Some(Command::Serve) | None => cmd_serve(config).await,
    }
}

/// Initialize the tracing subscriber.
fn init_logging(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("player_relay=debug,info")
    } else {
        EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("PLAYER RELAY - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    print!("Checking static directory... ");
    let index = config.static_dir.join("index.html");
    if index.is_file() {
        println!("OK");
    } else {
        println!("MISSING");
        println!("  {} not found; / will return 404", index.display());
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Bind Address: {}", config.bind_addr());
    println!("  Static Dir: {}", config.static_dir.display());
    println!("  Log Level: {}", config.rust_log);
    println!("  Log Format: {}", config.log_format);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Run the relay HTTP server until shutdown.
async fn cmd_serve(config: Config) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    let mut app_state = AppState::new();
    match metrics::install_prometheus() {
        Ok(handle) => app_state = app_state.with_prometheus(handle),
        Err(e) => warn!("Metrics recorder unavailable: {}", e),
    }

    let listener = TcpListener::bind(config.bind_target()).await.map_err(|e| {
        error!("Failed to bind {}: {}", config.bind_addr(), e);
        e
    })?;
    let local = listener.local_addr()?;

    info!("Server running on port {}", local.port());
    info!("Player tracker available at: http://localhost:{}", local.port());
    info!("API endpoints:");
    for (method, path, description) in ENDPOINTS {
        info!("  {} {} - {}", method, path, description);
    }

    let router = create_router(app_state, &config.static_dir);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
