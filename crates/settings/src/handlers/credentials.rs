//! Credential-store handler.
//!
//! Responsibilities:
//! - Resolve keys against a nested secret store through [`CredentialStore`].
//! - Provide a document-backed store (JSON/YAML) and an OS keyring store.
//!
//! Does NOT handle:
//! - Encrypting or decrypting credential files.
//! - Writing secrets back to any store.
//!
//! Invariants:
//! - `Debug` output never contains secret values.
//! - Keyring failures are treated as absent values and logged at debug level.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use super::{SettingHandler, dig};
use crate::constants::{DEFAULT_KEYRING_SERVICE, KEY_NESTING_SEPARATOR};
use crate::error::{Result, SettingsError};
use crate::key::{SettingKey, normalize, variants};

/// A nested secret store read one path at a time.
pub trait CredentialStore: Send + Sync + fmt::Debug {
    /// Value at `path`, or `None` when any segment is missing.
    fn dig(&self, path: &[String]) -> Option<Value>;

    fn has_key(&self, path: &[String]) -> bool {
        self.dig(path).is_some()
    }
}

/// Credentials held in a nested JSON object.
#[derive(Clone)]
pub struct CredentialTable {
    root: Value,
}

impl Default for CredentialTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CredentialTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.root.as_object().map_or(0, |map| map.len());
        f.debug_struct("CredentialTable")
            .field("entries", &entries)
            .finish_non_exhaustive()
    }
}

impl CredentialTable {
    /// An empty table.
    pub fn new() -> Self {
        Self {
            root: Value::Object(Default::default()),
        }
    }

    /// Wrap a nested object. Anything else is rejected.
    pub fn from_value(root: Value) -> Result<Self> {
        if !root.is_object() {
            return Err(SettingsError::CredentialsParse(
                "credentials must be a key/value mapping".to_string(),
            ));
        }
        Ok(Self { root })
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let root = serde_json::from_str(content)
            .map_err(|e| SettingsError::CredentialsParse(e.to_string()))?;
        Self::from_value(root)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let root = serde_yaml::from_str(content)
            .map_err(|e| SettingsError::CredentialsParse(e.to_string()))?;
        Self::from_value(root)
    }

    /// Load a `.json`, `.yml`, or `.yaml` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| SettingsError::ConfigFileRead {
                path: path.to_path_buf(),
                source,
            })?;

        let parsed = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yml") | Some("yaml") => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        };
        parsed.map_err(|e| SettingsError::ConfigFileParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl CredentialStore for CredentialTable {
    fn dig(&self, path: &[String]) -> Option<Value> {
        dig(&self.root, path).cloned()
    }
}

/// Builds the keyring entry for a `(service, account)` pair.
pub type KeyringEntryFactory =
    Arc<dyn Fn(&str, &str) -> keyring::Result<keyring::Entry> + Send + Sync>;

/// Credentials held in the OS keyring.
///
/// The account name is the key path joined with `.`; the service name is fixed
/// per store. Entries come from the platform store unless a factory is given.
#[derive(Clone)]
pub struct KeyringStore {
    service: String,
    entry: KeyringEntryFactory,
}

impl fmt::Debug for KeyringStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyringStore")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new(DEFAULT_KEYRING_SERVICE)
    }
}

impl KeyringStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self::with_entry_factory(service, keyring::Entry::new)
    }

    /// Use `factory` instead of the platform store to open entries.
    pub fn with_entry_factory(
        service: impl Into<String>,
        factory: impl Fn(&str, &str) -> keyring::Result<keyring::Entry> + Send + Sync + 'static,
    ) -> Self {
        Self {
            service: service.into(),
            entry: Arc::new(factory),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }
}

impl CredentialStore for KeyringStore {
    fn dig(&self, path: &[String]) -> Option<Value> {
        if path.is_empty() {
            return None;
        }
        let account = path.join(KEY_NESTING_SEPARATOR);

        let entry = match (self.entry)(&self.service, &account) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(
                    service = %self.service,
                    account = %account,
                    error = %e,
                    "keyring entry unavailable"
                );
                return None;
            }
        };
        match entry.get_password() {
            Ok(secret) => Some(Value::String(secret)),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                tracing::debug!(
                    service = %self.service,
                    account = %account,
                    error = %e,
                    "keyring lookup failed"
                );
                None
            }
        }
    }
}

/// Resolves settings from a credential store.
#[derive(Debug, Clone)]
pub struct CredentialsHandler {
    store: Arc<dyn CredentialStore>,
}

impl Default for CredentialsHandler {
    fn default() -> Self {
        Self::new(CredentialTable::new())
    }
}

impl CredentialsHandler {
    pub fn new(store: impl CredentialStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn from_shared(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    fn find_variant<T>(
        &self,
        key: &SettingKey,
        case_sensitive: bool,
        mut f: impl FnMut(&[String]) -> Option<T>,
    ) -> Option<T> {
        let segments = normalize(key, KEY_NESTING_SEPARATOR);
        if segments.is_empty() {
            return None;
        }
        variants(&segments, case_sensitive)
            .iter()
            .find_map(|variant| f(variant.as_slice()))
    }
}

impl SettingHandler for CredentialsHandler {
    fn name(&self) -> &str {
        "credentials"
    }

    fn exists(&self, key: &SettingKey, case_sensitive: bool) -> bool {
        self.find_variant(key, case_sensitive, |path| {
            self.store.has_key(path).then_some(())
        })
        .is_some()
    }

    fn get(&self, key: &SettingKey, case_sensitive: bool) -> Option<Value> {
        self.find_variant(key, case_sensitive, |path| self.store.dig(path))
    }
}
