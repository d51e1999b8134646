//! Error types for settings resolution.
//!
//! Responsibilities:
//! - Define error variants for configuration, handler construction, and the
//!   `raise` missing-key action.
//!
//! Does NOT handle:
//! - "Key not found" inside a handler. That is an absent value, never an error.
//!
//! Invariants:
//! - All error variants include context for debugging (key, handler name, path, etc.).
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while configuring or querying [`crate::Settings`].
#[derive(Error, Debug)]
pub enum SettingsError {
    /// A key was given in a shape that cannot be split into segments.
    #[error("Invalid key kind: expected a string or an array of strings, got {kind}")]
    InvalidKeyKind { kind: &'static str },

    #[error(
        "Unsupported handler '{0}'. Handlers must be a registered handler name or a handler instance"
    )]
    UnsupportedHandlerSpecification(String),

    #[error("Invalid parameter '{param}' for handler '{handler}': {message}")]
    InvalidHandlerParameter {
        handler: String,
        param: String,
        message: String,
    },

    /// Raised by the `raise` missing-key action.
    #[error("No matches found for '{key}'")]
    MissingKey { key: String },

    #[error("Unknown on_missing_key action: '{0}'")]
    UnknownMissingKeyAction(String),

    #[error("Unknown coercion: '{0}'")]
    UnknownCoercion(String),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Failed to read file at {path}")]
    ConfigFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse file at {path}: {message}")]
    ConfigFileParse { path: PathBuf, message: String },

    /// The credential document is not a nested key/value structure.
    #[error("Failed to parse credentials: {0}")]
    CredentialsParse(String),

    #[error("Failed to load settings object: {0}")]
    ConfigObject(String),

    /// SAFETY: Only the byte index of the parse failure is kept, never the line.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,

    #[error("Settings have not been configured. Call unified_settings::configure() first")]
    NotConfigured,

    #[error("Settings have already been configured")]
    AlreadyConfigured,
}

pub type Result<T> = std::result::Result<T, SettingsError>;

impl From<dotenvy::Error> for SettingsError {
    fn from(err: dotenvy::Error) -> Self {
        match err {
            dotenvy::Error::LineParse(_, idx) => SettingsError::DotenvParse { error_index: idx },
            dotenvy::Error::Io(io_err) => SettingsError::DotenvIo {
                kind: io_err.kind(),
            },
            _ => SettingsError::DotenvUnknown,
        }
    }
}
