//! Process-wide settings instance.
//!
//! Invariants:
//! - The instance is configured at most once; later calls to [`configure`] fail
//!   with `AlreadyConfigured` and leave the first instance in place.
//! - Lookups before [`configure`] fail with `NotConfigured` instead of building
//!   a default instance behind the caller's back.

use std::sync::OnceLock;

use serde_json::Value;

use crate::config::SettingsConfig;
use crate::error::{Result, SettingsError};
use crate::key::SettingKey;
use crate::resolver::{ExistsOptions, GetOptions, Settings};

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Build the process-wide instance from `config`.
pub fn configure(config: SettingsConfig) -> Result<&'static Settings> {
    if SETTINGS.get().is_some() {
        return Err(SettingsError::AlreadyConfigured);
    }

    let settings = Settings::new(config)?;
    SETTINGS
        .set(settings)
        .map_err(|_| SettingsError::AlreadyConfigured)?;
    settings_ref()
}

/// The process-wide instance.
pub fn settings() -> Result<&'static Settings> {
    settings_ref()
}

fn settings_ref() -> Result<&'static Settings> {
    SETTINGS.get().ok_or(SettingsError::NotConfigured)
}

pub fn get(key: impl Into<SettingKey>) -> Result<Value> {
    settings()?.get(key)
}

pub fn get_with(key: impl Into<SettingKey>, options: &GetOptions) -> Result<Value> {
    settings()?.get_with(key, options)
}

pub fn exists(key: impl Into<SettingKey>) -> Result<bool> {
    Ok(settings()?.exists(key))
}

pub fn exists_with(key: impl Into<SettingKey>, options: &ExistsOptions) -> Result<bool> {
    settings()?.exists_with(key, options)
}
