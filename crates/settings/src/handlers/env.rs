//! Environment variable handler.
//!
//! Responsibilities:
//! - Resolve keys against the process environment or an owned variable map.
//! - Flatten nested keys with `__` (`database.url` -> `DATABASE__URL`).
//! - Optionally layer a `.env` file underneath the process environment.
//!
//! Does NOT handle:
//! - Mutating the process environment. `.env` values stay inside the handler.
//!
//! Invariants:
//! - Process variables take precedence over `.env` file values.
//! - A variable set to the empty string is present.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use super::SettingHandler;
use crate::constants::{ENV_KEY_NESTING_SEPARATOR, KEY_NESTING_SEPARATOR};
use crate::error::{Result, SettingsError};
use crate::key::{SettingKey, normalize, variants};

#[derive(Debug, Clone)]
enum EnvSource {
    /// Live process environment, falling back to values read from a `.env` file.
    Process { fallback: HashMap<String, String> },
    /// A fixed set of variables; the process environment is not consulted.
    Vars(HashMap<String, String>),
}

/// Resolves settings from environment variables.
#[derive(Debug, Clone)]
pub struct EnvHandler {
    source: EnvSource,
    prefix: String,
    separator: String,
}

impl Default for EnvHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvHandler {
    /// Read from the live process environment.
    pub fn new() -> Self {
        Self {
            source: EnvSource::Process {
                fallback: HashMap::new(),
            },
            prefix: String::new(),
            separator: ENV_KEY_NESTING_SEPARATOR.to_string(),
        }
    }

    /// Read only from the given variables.
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            source: EnvSource::Vars(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            ..Self::new()
        }
    }

    /// Read from the process environment, falling back to a `.env` file.
    ///
    /// A missing file is not an error. Parse errors never include line contents.
    pub fn from_dotenv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let iter = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter,
            Err(dotenvy::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    path = %path.display(),
                    ".env file not found; using process environment only"
                );
                return Ok(Self::new());
            }
            Err(e) => return Err(e.into()),
        };

        let fallback = iter
            .collect::<std::result::Result<HashMap<_, _>, _>>()
            .map_err(SettingsError::from)?;
        Ok(Self {
            source: EnvSource::Process { fallback },
            ..Self::new()
        })
    }

    /// Prepend `prefix` verbatim to every variable name (e.g. `APP_`).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Replace the `__` nesting separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    fn lookup(&self, name: &str) -> Option<String> {
        match &self.source {
            EnvSource::Process { fallback } => std::env::var(name)
                .ok()
                .or_else(|| fallback.get(name).cloned()),
            EnvSource::Vars(vars) => vars.get(name).cloned(),
        }
    }

    fn candidate_names(&self, key: &SettingKey, case_sensitive: bool) -> Vec<String> {
        let segments = normalize(key, KEY_NESTING_SEPARATOR);
        if segments.is_empty() {
            return Vec::new();
        }
        variants(&segments, case_sensitive)
            .into_iter()
            .map(|variant| format!("{}{}", self.prefix, variant.join(&self.separator)))
            .collect()
    }
}

impl SettingHandler for EnvHandler {
    fn name(&self) -> &str {
        "env"
    }

    fn exists(&self, key: &SettingKey, case_sensitive: bool) -> bool {
        self.candidate_names(key, case_sensitive)
            .iter()
            .any(|name| self.lookup(name).is_some())
    }

    fn get(&self, key: &SettingKey, case_sensitive: bool) -> Option<Value> {
        self.candidate_names(key, case_sensitive)
            .iter()
            .find_map(|name| self.lookup(name))
            .map(Value::String)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_nested_keys_join_with_double_underscore() {
        let handler = EnvHandler::from_vars([("FOO__BAR", "1")]);

        assert_eq!(handler.get(&"foo.bar".into(), false), Some(json!("1")));
        assert!(handler.exists(&"foo.bar".into(), false));
        assert!(handler.exists(&["FOO", "BAR"].into(), true));
    }

    #[test]
    fn test_case_insensitive_widening() {
        let handler = EnvHandler::from_vars([("FOO", "V")]);

        assert_eq!(handler.get(&"foo".into(), false), Some(json!("V")));
        assert_eq!(handler.get(&"Foo".into(), false), Some(json!("V")));
        assert_eq!(handler.get(&"foo".into(), true), None);
        assert!(!handler.exists(&"foo".into(), true));
        assert!(handler.exists(&"FOO".into(), true));
    }

    #[test]
    fn test_exact_case_preferred_over_forced_case() {
        let handler = EnvHandler::from_vars([("Mixed", "exact"), ("MIXED", "upper")]);
        assert_eq!(handler.get(&"Mixed".into(), false), Some(json!("exact")));
    }

    #[test]
    fn test_empty_variable_is_present() {
        let handler = EnvHandler::from_vars([("EMPTY", "")]);

        assert!(handler.exists(&"empty".into(), false));
        assert_eq!(handler.get(&"empty".into(), false), Some(json!("")));
    }

    #[test]
    fn test_prefix_and_separator() {
        let handler = EnvHandler::from_vars([("APP_DB_URL", "postgres://")])
            .with_prefix("APP_")
            .with_separator("_");

        assert_eq!(
            handler.get(&"db.url".into(), false),
            Some(json!("postgres://"))
        );
        assert_eq!(handler.get(&"db.url".into(), true), None);
    }

    #[test]
    fn test_empty_key_finds_nothing() {
        let handler = EnvHandler::from_vars([("", "weird")]);
        assert_eq!(handler.get(&"".into(), false), None);
    }

    #[test]
    #[serial]
    fn test_reads_live_process_environment() {
        temp_env::with_vars([("UNIFIED_SETTINGS_TEST_LIVE__VALUE", Some("live"))], || {
            let handler = EnvHandler::new();
            assert_eq!(
                handler.get(&"unified_settings_test_live.value".into(), false),
                Some(json!("live"))
            );
        });
    }

    #[test]
    #[serial]
    fn test_dotenv_values_sit_below_process_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "US_DOTENV_ONLY=from-file").unwrap();
        writeln!(file, "US_DOTENV_BOTH=from-file").unwrap();

        temp_env::with_vars(
            [
                ("US_DOTENV_BOTH", Some("from-process")),
                ("US_DOTENV_ONLY", None),
            ],
            || {
                let handler = EnvHandler::from_dotenv(&path).unwrap();

                assert_eq!(
                    handler.get(&"us_dotenv_only".into(), false),
                    Some(json!("from-file"))
                );
                assert_eq!(
                    handler.get(&"us_dotenv_both".into(), false),
                    Some(json!("from-process"))
                );
                assert!(std::env::var("US_DOTENV_ONLY").is_err());
            },
        );
    }

    #[test]
    fn test_missing_dotenv_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(EnvHandler::from_dotenv(dir.path().join("missing.env")).is_ok());
    }
}
