//! One source's partial view of the resolver configuration.

use crate::coercer::CoercionKind;
use crate::config::SettingsConfig;
use crate::handlers::HandlerSpec;
use crate::missing::{DefaultValue, MissingKeyAction};

/// Partially specified configuration; `None` defers to lower layers.
#[derive(Debug, Clone, Default)]
pub(super) struct ConfigLayer {
    pub handlers: Option<Vec<HandlerSpec>>,
    pub case_sensitive: Option<bool>,
    pub on_missing_key: Option<Vec<MissingKeyAction>>,
    pub default_value: Option<DefaultValue>,
    pub coercions: Option<Vec<CoercionKind>>,
    pub coerce_arrays: Option<bool>,
    pub coerce_array_separator: Option<char>,
}

impl ConfigLayer {
    /// Fill every unset field from `lower`.
    pub fn or(self, lower: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            handlers: self.handlers.or(lower.handlers),
            case_sensitive: self.case_sensitive.or(lower.case_sensitive),
            on_missing_key: self.on_missing_key.or(lower.on_missing_key),
            default_value: self.default_value.or(lower.default_value),
            coercions: self.coercions.or(lower.coercions),
            coerce_arrays: self.coerce_arrays.or(lower.coerce_arrays),
            coerce_array_separator: self.coerce_array_separator.or(lower.coerce_array_separator),
        }
    }

    /// Fill the remaining gaps with the built-in defaults.
    pub fn into_config(self) -> SettingsConfig {
        let defaults = SettingsConfig::default();
        SettingsConfig {
            handlers: self.handlers.unwrap_or(defaults.handlers),
            case_sensitive: self.case_sensitive.unwrap_or(defaults.case_sensitive),
            on_missing_key: self.on_missing_key.unwrap_or(defaults.on_missing_key),
            default_value: self.default_value.unwrap_or(defaults.default_value),
            coercions: self.coercions.unwrap_or(defaults.coercions),
            coerce_arrays: self.coerce_arrays.unwrap_or(defaults.coerce_arrays),
            coerce_array_separator: self
                .coerce_array_separator
                .unwrap_or(defaults.coerce_array_separator),
        }
    }
}
