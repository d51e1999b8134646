//! Construction-time configuration for [`crate::Settings`].

use crate::coercer::{CoercionKind, Coercer};
use crate::constants::DEFAULT_ARRAY_SEPARATOR;
use crate::handlers::{HandlerKind, HandlerSpec};
use crate::missing::{DefaultValue, MissingKeyAction, Severity};

/// Resolver configuration.
///
/// Defaults: handlers `env`, `credentials`, `constants` (in that order),
/// case-insensitive keys, log missing keys at error level, `null` default,
/// every coercion kind, array splitting on `,`.
#[derive(Debug, Clone)]
pub struct SettingsConfig {
    pub handlers: Vec<HandlerSpec>,
    pub case_sensitive: bool,
    pub on_missing_key: Vec<MissingKeyAction>,
    pub default_value: DefaultValue,
    pub coercions: Vec<CoercionKind>,
    pub coerce_arrays: bool,
    pub coerce_array_separator: char,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            handlers: vec![
                HandlerKind::Env.into(),
                HandlerKind::Credentials.into(),
                HandlerKind::Constants.into(),
            ],
            case_sensitive: false,
            on_missing_key: vec![MissingKeyAction::Log(Severity::Error)],
            default_value: DefaultValue::default(),
            coercions: CoercionKind::ALL.to_vec(),
            coerce_arrays: true,
            coerce_array_separator: DEFAULT_ARRAY_SEPARATOR,
        }
    }
}

impl SettingsConfig {
    /// The coercer described by this configuration.
    pub fn coercer(&self) -> Coercer {
        Coercer::new()
            .with_coercions(self.coercions.iter().copied())
            .with_arrays(self.coerce_arrays)
            .with_array_separator(self.coerce_array_separator)
    }
}
