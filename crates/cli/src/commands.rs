//! Subcommand execution.
//!
//! Responsibilities:
//! - Translate `get`/`exists` arguments into resolver calls.
//! - Render resolved values to stdout.
//!
//! Invariants:
//! - Only values go to stdout; diagnostics go to stderr through `tracing`.

use anyhow::{Context, Result};
use unified_settings::{GetOptions, MissingKeyAction, Settings, Value};

use crate::args::{Commands, OutputFormat};
use crate::error::ExitCode;

pub fn run_command(command: Commands, settings: &Settings) -> Result<ExitCode> {
    match command {
        Commands::Get {
            key,
            default,
            no_coerce,
            on_missing_key,
            output,
        } => {
            let mut options = GetOptions::new().coerce(!no_coerce);
            if let Some(default) = default {
                options = options.with_default(default);
            }
            if !on_missing_key.is_empty() {
                let actions = on_missing_key
                    .iter()
                    .map(|name| name.parse::<MissingKeyAction>())
                    .collect::<Result<Vec<_>, _>>()
                    .context("Invalid --on-missing-key")?;
                options = options.on_missing_key(actions);
            }

            let value = settings
                .get_with(&key, &options)
                .with_context(|| format!("Failed to resolve '{key}'"))?;
            println!("{}", render(&value, output)?);
            Ok(ExitCode::Success)
        }
        Commands::Exists { key } => {
            let exists = settings.exists(&key);
            println!("{exists}");
            Ok(if exists {
                ExitCode::Success
            } else {
                ExitCode::KeyMissing
            })
        }
    }
}

fn render(value: &Value, format: OutputFormat) -> Result<String> {
    match (format, value) {
        (OutputFormat::Plain, Value::String(s)) => Ok(s.clone()),
        _ => serde_json::to_string(value).context("Failed to serialize value"),
    }
}
