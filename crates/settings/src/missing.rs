//! Missing-key actions and default values.
//!
//! Responsibilities:
//! - Run the configured actions when no handler produced a value.
//! - Resolve the default value returned after the actions ran.
//!
//! Invariants:
//! - Actions run in order and do not short-circuit each other; only `Raise`
//!   aborts resolution.
//! - Logging never fails. Without a `tracing` subscriber the message goes to stderr.

use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{Result, SettingsError};

/// Log severity of a missing-key message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
    /// Emitted at `ERROR` level with a `fatal = true` field.
    Fatal,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }
}

/// What to do when a key cannot be resolved.
#[derive(Clone)]
pub enum MissingKeyAction {
    /// Abort resolution with [`SettingsError::MissingKey`].
    Raise,
    Log(Severity),
    /// Called with the key; its return value is ignored.
    Callback(Arc<dyn Fn(&str) + Send + Sync>),
}

impl MissingKeyAction {
    pub fn callback(f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self::Callback(Arc::new(f))
    }

    /// Run the action for `key`.
    pub fn run(&self, key: &str) -> Result<()> {
        match self {
            Self::Raise => Err(SettingsError::MissingKey {
                key: key.to_string(),
            }),
            Self::Log(severity) => {
                log_missing_key(*severity, key);
                Ok(())
            }
            Self::Callback(f) => {
                f(key);
                Ok(())
            }
        }
    }
}

impl fmt::Debug for MissingKeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raise => f.write_str("Raise"),
            Self::Log(severity) => f.debug_tuple("Log").field(severity).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl FromStr for MissingKeyAction {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_start_matches(':').to_ascii_lowercase().as_str() {
            "raise" => Ok(Self::Raise),
            "log_debug" => Ok(Self::Log(Severity::Debug)),
            "log_info" => Ok(Self::Log(Severity::Info)),
            "log_warn" => Ok(Self::Log(Severity::Warn)),
            "log_error" => Ok(Self::Log(Severity::Error)),
            "log_fatal" => Ok(Self::Log(Severity::Fatal)),
            _ => Err(SettingsError::UnknownMissingKeyAction(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for MissingKeyAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a comma-separated action list such as `log_warn,raise`.
pub fn parse_actions(list: &str) -> Result<Vec<MissingKeyAction>> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::parse)
        .collect()
}

pub(crate) fn missing_key_message(key: &str) -> String {
    format!("No matches found for '{}'", key)
}

fn log_missing_key(severity: Severity, key: &str) {
    let has_subscriber = tracing::dispatcher::get_default(|dispatch| {
        !dispatch.is::<tracing::subscriber::NoSubscriber>()
    });
    if !has_subscriber {
        let _ = writeln!(
            std::io::stderr().lock(),
            "{} -- unified_settings: {}",
            severity.as_str(),
            missing_key_message(key)
        );
        return;
    }

    match severity {
        Severity::Debug => tracing::debug!(key, "{}", missing_key_message(key)),
        Severity::Info => tracing::info!(key, "{}", missing_key_message(key)),
        Severity::Warn => tracing::warn!(key, "{}", missing_key_message(key)),
        Severity::Error => tracing::error!(key, "{}", missing_key_message(key)),
        Severity::Fatal => tracing::error!(key, fatal = true, "{}", missing_key_message(key)),
    }
}

/// The value returned when no handler produced one.
#[derive(Clone)]
pub enum DefaultValue {
    Value(Value),
    /// Computed from the key.
    Callback(Arc<dyn Fn(&str) -> Value + Send + Sync>),
}

impl DefaultValue {
    pub fn callback(f: impl Fn(&str) -> Value + Send + Sync + 'static) -> Self {
        Self::Callback(Arc::new(f))
    }

    pub fn resolve(&self, key: &str) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Callback(f) => f(key),
        }
    }
}

impl Default for DefaultValue {
    fn default() -> Self {
        Self::Value(Value::Null)
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl From<Value> for DefaultValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        Self::Value(Value::String(value))
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        Self::Value(Value::Bool(value))
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        Self::Value(Value::from(value))
    }
}
