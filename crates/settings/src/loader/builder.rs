//! Resolver configuration builder.
//!
//! Responsibilities:
//! - Collect configuration from a file, environment variables, and direct
//!   builder methods, and merge them into a [`SettingsConfig`].
//!
//! Does NOT handle:
//! - Building handlers. Specs are materialized by `Settings::new`.
//!
//! Invariants / Assumptions:
//! - Builder methods take precedence over environment variables, which take
//!   precedence over file values, which take precedence over defaults.
//!   Call order does not matter.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

use std::path::Path;

use super::env::{env_var_or_none, read_env};
use super::file::read_file;
use super::layer::ConfigLayer;
use crate::coercer::CoercionKind;
use crate::config::SettingsConfig;
use crate::constants::{ENV_CONFIG_PATH, ENV_DOTENV_DISABLED};
use crate::error::{Result, SettingsError};
use crate::handlers::HandlerSpec;
use crate::missing::{DefaultValue, MissingKeyAction};

/// Builds a [`SettingsConfig`] from layered sources.
#[derive(Debug, Clone, Default)]
pub struct SettingsConfigLoader {
    overrides: ConfigLayer,
    env: ConfigLayer,
    file: Option<ConfigLayer>,
}

impl SettingsConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var(ENV_DOTENV_DISABLED).ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from a `.env` file in the working directory.
    ///
    /// Skipped when `DOTENV_DISABLED` is `true` or `1`. A missing file is ignored.
    ///
    /// # Errors
    ///
    /// - `SettingsError::DotenvParse` when the file has invalid syntax.
    /// - `SettingsError::DotenvIo` when the file exists but cannot be read.
    ///
    /// SAFETY: Error messages never include raw .env line contents.
    pub fn load_dotenv(self) -> Result<Self> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(path) => {
                tracing::debug!(path = %path.display(), "loaded .env file");
                Ok(self)
            }
            Err(dotenvy::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                Ok(self)
            }
            Err(e) => Err(SettingsError::from(e)),
        }
    }

    /// Read a JSON (`.json`) or YAML configuration file.
    pub fn from_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        self.file = Some(read_file(path.as_ref())?);
        Ok(self)
    }

    /// Read the `UNIFIED_SETTINGS_*` environment variables.
    ///
    /// When `UNIFIED_SETTINGS_CONFIG_PATH` is set and no file was loaded yet,
    /// that file is read as well.
    pub fn from_env(mut self) -> Result<Self> {
        if self.file.is_none()
            && let Some(path) = env_var_or_none(ENV_CONFIG_PATH)
        {
            self.file = Some(read_file(Path::new(&path))?);
        }
        self.env = read_env()?;
        Ok(self)
    }

    pub fn with_handlers(mut self, handlers: impl IntoIterator<Item = HandlerSpec>) -> Self {
        self.overrides.handlers = Some(handlers.into_iter().collect());
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.overrides.case_sensitive = Some(case_sensitive);
        self
    }

    pub fn with_on_missing_key(
        mut self,
        actions: impl IntoIterator<Item = MissingKeyAction>,
    ) -> Self {
        self.overrides.on_missing_key = Some(actions.into_iter().collect());
        self
    }

    pub fn with_default_value(mut self, default: impl Into<DefaultValue>) -> Self {
        self.overrides.default_value = Some(default.into());
        self
    }

    pub fn with_coercions(mut self, coercions: impl IntoIterator<Item = CoercionKind>) -> Self {
        self.overrides.coercions = Some(coercions.into_iter().collect());
        self
    }

    pub fn with_coerce_arrays(mut self, enabled: bool) -> Self {
        self.overrides.coerce_arrays = Some(enabled);
        self
    }

    pub fn with_array_separator(mut self, separator: char) -> Self {
        self.overrides.coerce_array_separator = Some(separator);
        self
    }

    /// Merge every layer over the built-in defaults.
    pub fn build(self) -> Result<SettingsConfig> {
        let file = self.file.unwrap_or_default();
        Ok(self.overrides.or(self.env).or(file).into_config())
    }
}
