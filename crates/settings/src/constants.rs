//! Centralized constants for settings resolution.
//!
//! Default values and separators shared by the key normalizer, the handlers,
//! and the configuration loader.

// =============================================================================
// Key Separators
// =============================================================================

/// Separator for generic nested keys (`database.pool.size`).
pub const KEY_NESTING_SEPARATOR: &str = ".";

/// Separator for namespaced constant keys (`App::Limits::TIMEOUT`).
pub const CONSTANT_KEY_NESTING_SEPARATOR: &str = "::";

/// Separator used to flatten nested keys into environment variable names.
pub const ENV_KEY_NESTING_SEPARATOR: &str = "__";

// =============================================================================
// Coercion Defaults
// =============================================================================

/// Default character used to split array-like values.
pub const DEFAULT_ARRAY_SEPARATOR: char = ',';

// =============================================================================
// Handler Defaults
// =============================================================================

/// Default file backing the config-object handler.
pub const DEFAULT_CONFIG_OBJECT_PATH: &str = "config/settings.yml";

/// Service name used for keyring-backed credentials when none is configured.
pub const DEFAULT_KEYRING_SERVICE: &str = "unified-settings";

// =============================================================================
// Loader Environment Variables
// =============================================================================

pub const ENV_CONFIG_PATH: &str = "UNIFIED_SETTINGS_CONFIG_PATH";
pub const ENV_HANDLERS: &str = "UNIFIED_SETTINGS_HANDLERS";
pub const ENV_CASE_SENSITIVE: &str = "UNIFIED_SETTINGS_CASE_SENSITIVE";
pub const ENV_ON_MISSING_KEY: &str = "UNIFIED_SETTINGS_ON_MISSING_KEY";
pub const ENV_DEFAULT_VALUE: &str = "UNIFIED_SETTINGS_DEFAULT_VALUE";
pub const ENV_COERCIONS: &str = "UNIFIED_SETTINGS_COERCIONS";
pub const ENV_COERCE_ARRAYS: &str = "UNIFIED_SETTINGS_COERCE_ARRAYS";
pub const ENV_ARRAY_SEPARATOR: &str = "UNIFIED_SETTINGS_ARRAY_SEPARATOR";

/// Set to `1` or `true` to skip `.env` loading.
pub const ENV_DOTENV_DISABLED: &str = "DOTENV_DISABLED";
