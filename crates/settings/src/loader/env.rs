//! Environment variable parsing for resolver configuration.
//!
//! Responsibilities:
//! - Read the `UNIFIED_SETTINGS_*` variables into a configuration layer.
//!
//! Does NOT handle:
//! - `.env` loading (see `SettingsConfigLoader::load_dotenv`).
//! - Settings lookups through the env handler (see `handlers/env.rs`).
//!
//! Invariants:
//! - Empty or whitespace-only variables are treated as unset.
//! - Values are trimmed before parsing.
//! - Malformed values fail with `SettingsError::InvalidValue` naming the variable.

use serde_json::Value;

use super::layer::ConfigLayer;
use crate::coercer::CoercionKind;
use crate::constants::{
    ENV_ARRAY_SEPARATOR, ENV_CASE_SENSITIVE, ENV_COERCE_ARRAYS, ENV_COERCIONS, ENV_DEFAULT_VALUE,
    ENV_HANDLERS, ENV_ON_MISSING_KEY,
};
use crate::error::{Result, SettingsError};
use crate::handlers::HandlerSpec;
use crate::missing::{DefaultValue, parse_actions};

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Build a configuration layer from the process environment.
pub(super) fn read_env() -> Result<ConfigLayer> {
    let mut layer = ConfigLayer::default();

    if let Some(handlers) = env_var_or_none(ENV_HANDLERS) {
        layer.handlers = Some(
            handlers
                .split(',')
                .map(str::trim)
                .filter(|spec| !spec.is_empty())
                .map(str::parse::<HandlerSpec>)
                .collect::<Result<_>>()?,
        );
    }
    if let Some(flag) = env_var_or_none(ENV_CASE_SENSITIVE) {
        layer.case_sensitive = Some(parse_bool(ENV_CASE_SENSITIVE, &flag)?);
    }
    if let Some(actions) = env_var_or_none(ENV_ON_MISSING_KEY) {
        layer.on_missing_key = Some(if is_none(&actions) {
            Vec::new()
        } else {
            parse_actions(&actions)?
        });
    }
    if let Some(default) = env_var_or_none(ENV_DEFAULT_VALUE) {
        layer.default_value = Some(DefaultValue::Value(Value::String(default)));
    }
    if let Some(coercions) = env_var_or_none(ENV_COERCIONS) {
        layer.coercions = Some(if is_none(&coercions) {
            Vec::new()
        } else {
            coercions
                .split(',')
                .map(str::trim)
                .filter(|kind| !kind.is_empty())
                .map(str::parse::<CoercionKind>)
                .collect::<Result<_>>()?
        });
    }
    if let Some(flag) = env_var_or_none(ENV_COERCE_ARRAYS) {
        layer.coerce_arrays = Some(parse_bool(ENV_COERCE_ARRAYS, &flag)?);
    }
    if let Some(separator) = env_var_or_none(ENV_ARRAY_SEPARATOR) {
        layer.coerce_array_separator = Some(parse_separator(&separator)?);
    }

    Ok(layer)
}

fn is_none(value: &str) -> bool {
    value.eq_ignore_ascii_case("none")
}

fn parse_bool(var: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(SettingsError::InvalidValue {
            var: var.to_string(),
            message: "must be true or false".to_string(),
        }),
    }
}

fn parse_separator(value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(separator), None) => Ok(separator),
        _ => Err(SettingsError::InvalidValue {
            var: ENV_ARRAY_SEPARATOR.to_string(),
            message: "must be exactly one character".to_string(),
        }),
    }
}
