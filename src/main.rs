//! Vibey - quota-gated, humanized reply agent
//!
//! Entry point for the `vibey` CLI.

mod cli;
mod cmd_history;
mod cmd_run;
mod cmd_status;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::warn;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use vibey_config::{ConfigLoader, LOCAL_ENV_FILE};

use crate::cli::{Cli, Commands};

/// Get the ~/.vibey directory path.
fn vibey_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".vibey"))
        .unwrap_or_else(|| PathBuf::from(".vibey"))
}

/// Initialize tracing with console and daily-rolling file output under ~/.vibey/logs.
fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = vibey_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("vibey")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The worker flushes only while its guard is alive.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    // Local secrets win over the inherited environment.
    if let Err(e) = ConfigLoader::load_env_file(Path::new(LOCAL_ENV_FILE)) {
        warn!("{}", e);
    }

    let cli = Cli::parse();
    let config = ConfigLoader::resolve(cli.config.as_deref())?;

    let code = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => cmd_run::run(config).await?,
        Commands::History { context_id } => {
            cmd_history::history(&config, context_id.as_deref()).await
        }
        Commands::Status => cmd_status::status(&config).await,
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
