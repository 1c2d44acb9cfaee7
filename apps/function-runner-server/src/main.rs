mod config;
mod logging;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use function_runner::FunctionRunner;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;

/// Function Runner Server - calculator page for the serverless functions lab
#[derive(Parser)]
#[command(name = "function-runner-server")]
#[command(about = "Function Runner Server - calculator page for the serverless functions lab")]
#[command(version)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address override, e.g. 0.0.0.0:8087 (overrides config)
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (FUNCTION_RUNNER__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.bind);

    logging::init_logging(&config.logging, cli.verbose);

    if cli.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    // Building the client also proves the TLS roots load
    config
        .http_client
        .build_client()
        .context("failed to build HTTP client")?;
    println!("Configuration is valid");
    println!("{}", config.to_json()?);
    Ok(())
}

async fn run_server(config: AppConfig) -> Result<()> {
    let client = config
        .http_client
        .build_client()
        .context("failed to build HTTP client")?;
    let runner = Arc::new(
        FunctionRunner::from_client(client).with_session_limit(config.server.max_sessions),
    );
    let app = runner.router().layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    tracing::info!(addr = %listener.local_addr()?, "Function Runner listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Function Runner stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
