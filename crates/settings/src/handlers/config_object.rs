//! External settings-object handler backed by `figment`.
//!
//! Responsibilities:
//! - Resolve nested keys against a merged settings object (TOML/YAML/JSON files,
//!   optionally overlaid with prefixed environment variables).
//!
//! Does NOT handle:
//! - Reloading when files change. The figment is fixed at construction.
//!
//! Invariants:
//! - The figment is extracted once at construction; lookups never fail loudly.
//! - Keys descend the extracted object one segment at a time, so a segment
//!   containing `.` never matches a nested path.
//! - A missing settings file is an empty settings object.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Json, Toml, Yaml};
use serde_json::Value;

use super::{SettingHandler, dig};
use crate::constants::KEY_NESTING_SEPARATOR;
use crate::error::{Result, SettingsError};
use crate::key::{SettingKey, normalize, variants};

/// Resolves settings from a `figment` settings object.
#[derive(Debug, Clone)]
pub struct ConfigObjectHandler {
    figment: Figment,
    root: Value,
}

impl ConfigObjectHandler {
    /// Wrap an existing figment, extracting its merged value up front.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let root = figment
            .extract::<Value>()
            .map_err(|e| SettingsError::ConfigObject(e.to_string()))?;
        Ok(Self { figment, root })
    }

    /// Load a settings file; the format follows the extension (`.toml`, `.json`,
    /// otherwise YAML).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Figment::from(Toml::file(path)),
            Some("json") => Figment::from(Json::file(path)),
            _ => Figment::from(Yaml::file(path)),
        };
        Self::from_figment(figment)
    }

    /// Overlay environment variables named `<prefix><a><separator><b>` as `a.b`.
    pub fn with_env(self, prefix: &str, separator: &str) -> Result<Self> {
        Self::from_figment(self.figment.merge(Env::prefixed(prefix).split(separator)))
    }

    pub fn figment(&self) -> &Figment {
        &self.figment
    }
}

impl SettingHandler for ConfigObjectHandler {
    fn name(&self) -> &str {
        "config_object"
    }

    fn get(&self, key: &SettingKey, case_sensitive: bool) -> Option<Value> {
        let segments = normalize(key, KEY_NESTING_SEPARATOR);
        if segments.is_empty() {
            return None;
        }

        variants(&segments, case_sensitive)
            .iter()
            .find_map(|variant| dig(&self.root, variant))
            .cloned()
    }
}
