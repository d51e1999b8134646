//! Resolver configuration files.
//!
//! Responsibilities:
//! - Read a JSON or YAML file (chosen by extension) into a configuration layer.
//!
//! Invariants:
//! - Every field is optional; absent fields defer to the built-in defaults.
//! - Unknown fields are rejected so typos surface at startup.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::layer::ConfigLayer;
use crate::coercer::CoercionKind;
use crate::error::{Result, SettingsError};
use crate::handlers::HandlerSpec;
use crate::missing::{DefaultValue, MissingKeyAction};

/// On-disk shape of a resolver configuration file.
///
/// ```yaml
/// handlers:
///   - env?prefix=APP_
///   - handler: credentials
///     params: { path: config/credentials.yml }
/// case_sensitive: false
/// on_missing_key: [log_warn]
/// coercions: [boolean, integer]
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    handlers: Option<Vec<HandlerSpec>>,
    case_sensitive: Option<bool>,
    on_missing_key: Option<Vec<MissingKeyAction>>,
    default_value: Option<Value>,
    coercions: Option<Vec<CoercionKind>>,
    coerce_arrays: Option<bool>,
    coerce_array_separator: Option<char>,
}

impl From<SettingsFile> for ConfigLayer {
    fn from(file: SettingsFile) -> Self {
        ConfigLayer {
            handlers: file.handlers,
            case_sensitive: file.case_sensitive,
            on_missing_key: file.on_missing_key,
            default_value: file.default_value.map(DefaultValue::Value),
            coercions: file.coercions,
            coerce_arrays: file.coerce_arrays,
            coerce_array_separator: file.coerce_array_separator,
        }
    }
}

pub(super) fn read_file(path: &Path) -> Result<ConfigLayer> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::ConfigFileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let parse_error = |message: String| SettingsError::ConfigFileParse {
        path: path.to_path_buf(),
        message,
    };
    let file: SettingsFile = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
        _ if content.trim().is_empty() => SettingsFile::default(),
        _ => serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
    };

    tracing::debug!(path = %path.display(), "loaded settings configuration file");
    Ok(file.into())
}
