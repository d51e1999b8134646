//! Unified settings resolution.
//!
//! One logical key such as `database.pool.size` is looked up across an ordered
//! list of stores (environment variables, a credentials table, namespaced
//! constants, an external settings object). The first store that has a value
//! wins; raw strings are coerced into booleans, numbers, nil, or arrays; a
//! configurable policy handles keys that no store defines.
//!
//! ```no_run
//! use unified_settings::{GetOptions, Settings, SettingsConfig};
//!
//! let settings = Settings::new(SettingsConfig::default())?;
//! let pool_size = settings.get("database.pool.size")?;
//! let region = settings.get_with("aws.region", &GetOptions::new().with_default("us-east-1"))?;
//! # Ok::<(), unified_settings::SettingsError>(())
//! ```

mod coercer;
mod config;
pub mod constants;
mod error;
mod global;
pub mod handlers;
mod key;
mod loader;
mod missing;
mod resolver;

pub use coercer::{Coercer, CoercionKind};
pub use config::SettingsConfig;
pub use error::{Result, SettingsError};
pub use global::{configure, exists, exists_with, get, get_with, settings};
pub use handlers::{
    ConfigObjectHandler, ConstantsHandler, CredentialStore, CredentialTable, CredentialsHandler,
    EnvHandler, HandlerKind, HandlerRegistry, HandlerSpec, KeyringStore, SettingHandler,
};
pub use key::{SettingKey, normalize, normalize_value, variants};
pub use loader::{SettingsConfigLoader, env_var_or_none};
pub use missing::{DefaultValue, MissingKeyAction, Severity, parse_actions};
pub use resolver::{ExistsOptions, GetOptions, Settings};
pub use serde_json::Value;
