//! feed-shell: routing and auth bootstrap for the social feed web app.
//!
//! # Architecture Overview
//!
//! ```text
//!   config.toml + env + flags
//!            │
//!            ▼
//!   ┌─────────────────┐     ┌─────────────────┐
//!   │  config loader  │────▶│   validation    │──── invalid ──▶ exit
//!   └─────────────────┘     └────────┬────────┘
//!                                    │
//!                 ┌──────────────────┴──────────────────┐
//!                 ▼                                      ▼
//!        ┌─────────────────┐                   ┌──────────────────┐
//!        │   route table   │                   │  auth bootstrap  │──▶ discovery
//!        └────────┬────────┘                   └────────┬─────────┘    (optional)
//!                 │                                      │
//!                 └──────────────┬───────────────────────┘
//!                                ▼
//!                       ┌─────────────────┐
//!   Browser request ───▶│   HTTP server   │───▶ page descriptor / 404 / 503
//!                       └─────────────────┘
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::net::TcpListener;

use feed_shell::config::loader::load_unvalidated;
use feed_shell::config::{ConfigError, ShellConfig};
use feed_shell::lifecycle::{Application, Shutdown};
use feed_shell::observability::{logging, metrics};
use feed_shell::routing::{build_route_table, Resolution};
use feed_shell::HttpServer;

#[derive(Parser)]
#[command(name = "feed-shell", version)]
#[command(about = "Route table and auth bootstrap for the feed web app", long_about = None)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(long)]
    bind: Option<String>,

    /// Override observability.log_level.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the route table over HTTP (default)
    Serve,
    /// Print the route table
    Routes,
    /// Resolve a path against the route table
    Resolve { path: String },
    /// Validate configuration and print the identity client settings
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Routes) => print_routes(),
        Some(Commands::Resolve { ref path }) => resolve(path),
        Some(Commands::CheckConfig) => check_config(&cli),
        Some(Commands::Serve) | None => serve(&cli).await,
    }
}

fn load(cli: &Cli) -> Result<ShellConfig, ConfigError> {
    let mut config = load_unvalidated(cli.config.as_deref(), |key| std::env::var(key).ok())?;
    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
    }
    if let Some(level) = &cli.log_level {
        config.observability.log_level = level.clone();
    }
    Ok(config)
}

fn print_routes() -> Result<(), Box<dyn std::error::Error>> {
    let table = build_route_table()?;
    for entry in table.entries() {
        println!("{:<22} {}", entry.pattern.as_str(), entry.page);
    }
    Ok(())
}

fn resolve(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let table = build_route_table()?;
    match table.resolve(path) {
        Resolution::Matched(route) => {
            let out = json!({
                "page": route.page(),
                "pattern": route.pattern(),
                "params": route.params,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
        Resolution::NotFound { path } => Err(format!("no route matches {path}").into()),
    }
}

fn check_config(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load(cli)?;
    let app = Application::bootstrap(config)?;
    if let Some(context) = app.auth.context() {
        println!("{}", serde_json::to_string_pretty(&context.client_settings())?);
    }
    Ok(())
}

async fn serve(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load(cli)?;
    logging::init_logging(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "feed-shell starting");

    let app = Application::bootstrap(config)?;
    let verification = app.spawn_verification();

    tracing::info!(
        bind_address = %app.config.listener.bind_address,
        request_timeout_secs = app.config.timeouts.request_secs,
        verify_on_startup = verification.is_some(),
        "Configuration loaded"
    );

    if app.config.observability.metrics_enabled {
        let addr = app.config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&app.config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.spawn_signal_listener();

    let server = HttpServer::new(app.config.clone(), app.table.clone(), app.auth.clone());
    server.run(listener, shutdown.subscribe()).await?;

    if let Some(handle) = verification {
        handle.abort();
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
