//! Setting handlers: pluggable adapters over one backing store each.
//!
//! Responsibilities:
//! - Define the [`SettingHandler`] capability shared by every store adapter.
//! - Provide the built-in environment, credentials, constants, and config-object handlers.
//! - Materialize handler specifications through [`HandlerRegistry`].
//!
//! Does NOT handle:
//! - Aggregation across handlers or coercion (see `resolver.rs`).
//!
//! Invariants:
//! - A key that is absent from the store is `None`/`false`, never an error.
//! - A stored `null` is absent; a stored `false`, `0`, or `""` is present.
//! - Lookups never mutate the backing store.

mod config_object;
mod constants;
mod credentials;
mod env;
mod registry;

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::SettingsError;
use crate::key::SettingKey;

pub use config_object::ConfigObjectHandler;
pub use constants::ConstantsHandler;
pub use credentials::{CredentialStore, CredentialTable, CredentialsHandler, KeyringStore};
pub use env::EnvHandler;
pub use registry::{HandlerFactory, HandlerParams, HandlerRegistry, HandlerSpec};

/// Existence and lookup over one configuration store.
///
/// `case_sensitive` is already resolved by the caller; handlers never consult
/// the process-wide default themselves.
pub trait SettingHandler: Send + Sync + fmt::Debug {
    /// Short name used in logs.
    fn name(&self) -> &str;

    fn exists(&self, key: &SettingKey, case_sensitive: bool) -> bool {
        self.get(key, case_sensitive).is_some()
    }

    fn get(&self, key: &SettingKey, case_sensitive: bool) -> Option<Value>;
}

/// The built-in handler types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    Env,
    Credentials,
    Constants,
    ConfigObject,
}

impl HandlerKind {
    /// Canonical registry name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Env => "env",
            Self::Credentials => "credentials",
            Self::Constants => "constants",
            Self::ConfigObject => "config_object",
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HandlerKind {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "env" | "environment" => Ok(Self::Env),
            "credentials" => Ok(Self::Credentials),
            "constants" => Ok(Self::Constants),
            "config_object" | "config" | "config_gem" => Ok(Self::ConfigObject),
            _ => Err(SettingsError::UnsupportedHandlerSpecification(
                s.to_string(),
            )),
        }
    }
}

/// Descend a nested object one segment at a time.
///
/// Returns `None` for an empty path, a missing segment, a non-object
/// intermediate, or a path ending in `null`.
pub(crate) fn dig<'a>(root: &'a Value, path: &[String]) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }

    let mut current = root;
    for segment in path {
        current = current.as_object()?.get(segment)?;
    }
    (!current.is_null()).then_some(current)
}
