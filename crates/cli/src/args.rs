//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//!
//! Non-responsibilities:
//! - Does not resolve settings (see `commands` module).
//! - Does not merge configuration sources (see `SettingsConfigLoader`).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "usettings")]
#[command(
    about = "Resolve configuration keys across environment, credentials, constants, and settings files",
    long_about = None
)]
#[command(version)]
#[command(
    after_help = "Examples:\n  usettings get database.pool.size\n  usettings --handler env --handler 'credentials?path=secrets.yml' get aws.region\n  usettings get feature_flags --output json\n  usettings get api.key --on-missing-key raise\n  usettings exists mailer.host\n"
)]
pub struct Cli {
    /// Resolver configuration file (JSON or YAML).
    ///
    /// Can also be set via UNIFIED_SETTINGS_CONFIG_PATH.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Handler specification, in lookup order (e.g. `env?prefix=APP_`). Repeatable.
    ///
    /// Replaces the configured handler list.
    #[arg(long = "handler", global = true, value_name = "SPEC")]
    pub handlers: Vec<String>,

    /// Match keys exactly instead of also trying upper- and lower-case forms
    #[arg(long, global = true)]
    pub case_sensitive: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the value of a key
    Get {
        /// Key to resolve (e.g. `database.pool.size`)
        key: String,

        /// Value to print when no handler defines the key
        #[arg(long, value_name = "VALUE")]
        default: Option<String>,

        /// Print the stored value without coercion
        #[arg(long)]
        no_coerce: bool,

        /// Action when the key is missing (raise, log_debug, ..., log_fatal). Repeatable.
        #[arg(long = "on-missing-key", value_name = "ACTION")]
        on_missing_key: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
        output: OutputFormat,
    },

    /// Print whether any handler defines a key; exit 2 when none does
    Exists {
        /// Key to look up
        key: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Strings as-is, everything else as JSON
    Plain,
    /// Always JSON
    Json,
}
