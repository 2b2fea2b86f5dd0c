//! OutlineGenie - heading outlines and a simulated side panel.
//!
//! Main entry point for the OutlineGenie CLI.

mod cli;
mod cmd_outline;
mod cmd_panel;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use outline_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};
use tracing::{debug, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Commands};

/// Initialize tracing: console output on stderr, plus daily-rolling log
/// files when a log directory is configured. `RUST_LOG` overrides the
/// configured level.
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let console = fmt::layer()
        .with_target(true)
        .with_ansi(logging.ansi)
        .with_writer(std::io::stderr);

    let file = match &logging.directory {
        Some(directory) => {
            let log_dir = ConfigLoader::expand_path(directory);
            std::fs::create_dir_all(&log_dir)
                .with_context(|| format!("Failed to create log directory {}", log_dir))?;

            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("outline-genie")
                .filename_suffix("log")
                .max_log_files(7)
                .build(&log_dir)
                .context("Failed to create log file appender")?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // The worker flushes until the guard is dropped.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file)
        .init();
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    ConfigLoader::load_or_default(path).context("Failed to load configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.logging)?;

    for warning in ConfigValidator::validate(&config).warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    debug!("OutlineGenie v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Outline { file, format, url } => {
            cmd_outline::run(&config, &file, format, url).await
        }
        Commands::Panel {
            files,
            select,
            dwell_ms,
        } => cmd_panel::run(&config, &files, select, dwell_ms).await,
    }
}
