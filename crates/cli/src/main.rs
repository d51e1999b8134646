//! usettings - query unified settings from the shell.
//!
//! Responsibilities:
//! - Parse command-line arguments.
//! - Build the resolver from a configuration file, `UNIFIED_SETTINGS_*`
//!   environment variables, and command-line overrides.
//! - Map outcomes to structured exit codes.
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing so `.env` values are visible
//!   to both the loader and the env handler.
//! - Logs go to stderr; stdout carries only the resolved value.

mod args;
mod commands;
mod error;

use anyhow::{Context, Result};
use args::Cli;
use clap::Parser;
use commands::run_command;
use error::{ExitCode, ExitCodeExt};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use unified_settings::{HandlerSpec, Settings, SettingsConfigLoader};

fn main() {
    if let Err(e) = SettingsConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::GeneralError.as_i32());
    }

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = build_settings(&cli).and_then(|settings| run_command(cli.command, &settings));
    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}

/// Precedence: command-line flags > environment variables > configuration file > defaults.
fn build_settings(cli: &Cli) -> Result<Settings> {
    let mut loader = SettingsConfigLoader::new();

    if let Some(ref path) = cli.config {
        loader = loader
            .from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    }
    loader = loader
        .from_env()
        .context("Failed to load configuration from environment")?;

    if !cli.handlers.is_empty() {
        let handlers = cli
            .handlers
            .iter()
            .map(|spec| spec.parse::<HandlerSpec>())
            .collect::<Result<Vec<_>, _>>()
            .context("Invalid --handler")?;
        loader = loader.with_handlers(handlers);
    }
    if cli.case_sensitive {
        loader = loader.with_case_sensitive(true);
    }

    let config = loader.build().context("Failed to build configuration")?;
    let settings = Settings::new(config).context("Failed to initialize handlers")?;
    tracing::debug!(
        handlers = ?settings.handlers().iter().map(|h| h.name()).collect::<Vec<_>>(),
        "resolver ready"
    );
    Ok(settings)
}
