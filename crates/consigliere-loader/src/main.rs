use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use consigliere_loader::config::LoaderConfig;
use consigliere_loader::seed::load_seeds;
use consigliere_loader::writer::SqliteWriter;

#[derive(Parser, Debug)]
#[command(
    name = "consigliere-loader",
    about = "Consigliere store loader - writes player, team and playoff seed data into the shared SQLite database"
)]
struct Cli {
    /// Path to loader configuration file
    #[arg(short, long, default_value = "config/consigliere-loader.toml")]
    config: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_str = std::fs::read_to_string(&cli.config)
        .with_context(|| format!("Failed to read config: {}", cli.config))?;
    let config: LoaderConfig =
        toml::from_str(&config_str).with_context(|| "Failed to parse loader config")?;

    let mut writer = SqliteWriter::open(&config.store.sqlite_path)
        .with_context(|| format!("Failed to open store DB: {}", config.store.sqlite_path))?;

    let summary = load_seeds(&config, &mut writer).context("Seed load failed")?;
    info!(
        players = summary.players,
        teams = summary.teams,
        playoff_series = summary.playoff_series,
        salary_warnings = summary.salary_warnings,
        "Load complete"
    );

    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
