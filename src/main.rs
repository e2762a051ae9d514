#![forbid(unsafe_code)]

mod cli;
mod color;
mod config;
mod constants;
mod display;
mod gui;
mod registry;
mod render;
mod store;
mod types;

use clap::Parser;
use tracing::{Level as TraceLevel, info};
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Command};
use config::Config;

/// Parse a log level name, defaulting to INFO
fn parse_log_level(level: &str) -> TraceLevel {
    match level.to_lowercase().as_str() {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    }
}

/// Peek at the config file's log level before logging is up
fn configured_log_level() -> Option<String> {
    let contents = std::fs::read_to_string(Config::path()).ok()?;
    let config: Config = serde_json::from_str(&contents).ok()?;
    Some(config.log_level)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // LOG_LEVEL wins over the config file
    let log_level = std::env::var(constants::env::LOG_LEVEL)
        .ok()
        .or_else(configured_log_level)
        .map(|level| parse_log_level(&level))
        .unwrap_or(TraceLevel::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = Config::load()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    info!(version = constants::version(), store = %config.store_dir().display(), "Starting barcode wallet");

    match cli.command {
        None | Some(Command::Gui) => gui::run_gui(&config)?,
        Some(command) => cli::run_command(command, &config)?,
    }
    Ok(())
}
