use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use consigliere_agents::generator::check_generator_available;
use consigliere_models::ConsigliereConfig;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "consigliere", about = "NBA Trade Consigliere - trade assistant HTTP server")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/consigliere.toml")]
    config: String,

    /// Override the configured bind address
    #[arg(short, long)]
    bind: Option<String>,
}

fn load_config(path: &str) -> Result<ConsigliereConfig> {
    if !Path::new(path).exists() {
        warn!(path, "Config file not found, using defaults");
        return Ok(ConsigliereConfig::default());
    }
    let config_str =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read config: {path}"))?;
    toml::from_str(&config_str).with_context(|| "Failed to parse config")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;
    if let Some(bind) = cli.bind {
        config.server.bind_addr = bind;
    }

    if !check_generator_available(&config.generator.program).await {
        warn!(
            program = %config.generator.program,
            "Generator not found; chat and trade analysis will return 503"
        );
    }

    let state = consigliere::build_state(&config)
        .with_context(|| format!("Failed to open store: {}", config.store.sqlite_path))?;
    let app = consigliere::router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    info!(address = %config.server.bind_addr, "Consigliere listening");

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("Received shutdown signal");
        cancel.cancel();
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("Server error")?;

    Ok(())
}
