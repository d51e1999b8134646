//! The settings resolver.
//!
//! Responsibilities:
//! - Ask handlers in configured order and return the first value found.
//! - Coerce the winning value unless the caller opted out.
//! - Run the missing-key actions and fall back to a default when nothing matched.
//!
//! Does NOT handle:
//! - Merging values across handlers. The first match wins.
//!
//! Invariants:
//! - The handler list is materialized once in [`Settings::new`] and never changes.
//! - `get`/`exists` take `&self` and mutate nothing, so one instance can serve
//!   many threads without locking.
//! - An absent or empty key returns immediately without consulting handlers or
//!   running missing-key actions.

use std::sync::Arc;

use serde_json::Value;

use crate::coercer::Coercer;
use crate::config::SettingsConfig;
use crate::error::Result;
use crate::handlers::{HandlerRegistry, HandlerSpec, SettingHandler};
use crate::key::SettingKey;
use crate::missing::{DefaultValue, MissingKeyAction};

/// Per-call overrides for [`Settings::get_with`].
#[derive(Debug, Clone)]
pub struct GetOptions {
    default: Option<DefaultValue>,
    case_sensitive: Option<bool>,
    coerce: bool,
    on_missing_key: Option<Vec<MissingKeyAction>>,
    handlers: Option<Vec<HandlerSpec>>,
}

impl Default for GetOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl GetOptions {
    pub fn new() -> Self {
        Self {
            default: None,
            case_sensitive: None,
            coerce: true,
            on_missing_key: None,
            handlers: None,
        }
    }

    /// Value returned when the key is missing, overriding the configured default.
    pub fn with_default(mut self, default: impl Into<DefaultValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_default_fn(mut self, f: impl Fn(&str) -> Value + Send + Sync + 'static) -> Self {
        self.default = Some(DefaultValue::callback(f));
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = Some(case_sensitive);
        self
    }

    /// Pass `false` to return the stored value untouched.
    pub fn coerce(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }

    pub fn on_missing_key(mut self, actions: impl IntoIterator<Item = MissingKeyAction>) -> Self {
        self.on_missing_key = Some(actions.into_iter().collect());
        self
    }

    /// Use a one-off handler list instead of the configured one.
    pub fn handlers(mut self, specs: impl IntoIterator<Item = HandlerSpec>) -> Self {
        self.handlers = Some(specs.into_iter().collect());
        self
    }
}

/// Per-call overrides for [`Settings::exists_with`].
#[derive(Debug, Clone, Default)]
pub struct ExistsOptions {
    case_sensitive: Option<bool>,
    handlers: Option<Vec<HandlerSpec>>,
}

impl ExistsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = Some(case_sensitive);
        self
    }

    pub fn handlers(mut self, specs: impl IntoIterator<Item = HandlerSpec>) -> Self {
        self.handlers = Some(specs.into_iter().collect());
        self
    }
}

/// Resolves one logical key across an ordered list of handlers.
#[derive(Debug, Clone)]
pub struct Settings {
    handlers: Vec<Arc<dyn SettingHandler>>,
    coercer: Coercer,
    case_sensitive: bool,
    on_missing_key: Vec<MissingKeyAction>,
    default_value: DefaultValue,
    registry: Arc<HandlerRegistry>,
}

impl Settings {
    /// Build a resolver with the built-in handler registry.
    pub fn new(config: SettingsConfig) -> Result<Self> {
        Self::with_registry(config, HandlerRegistry::new())
    }

    /// Build a resolver whose named handlers come from `registry`.
    pub fn with_registry(config: SettingsConfig, registry: HandlerRegistry) -> Result<Self> {
        let handlers = registry.build_all(&config.handlers)?;
        tracing::debug!(
            handlers = ?handlers.iter().map(|h| h.name()).collect::<Vec<_>>(),
            case_sensitive = config.case_sensitive,
            "settings resolver configured"
        );

        Ok(Self {
            coercer: config.coercer(),
            handlers,
            case_sensitive: config.case_sensitive,
            on_missing_key: config.on_missing_key,
            default_value: config.default_value,
            registry: Arc::new(registry),
        })
    }

    pub fn handlers(&self) -> &[Arc<dyn SettingHandler>] {
        &self.handlers
    }

    pub fn coercer(&self) -> &Coercer {
        &self.coercer
    }

    /// True when any handler defines `key`.
    pub fn exists(&self, key: impl Into<SettingKey>) -> bool {
        let key = key.into();
        !key.is_empty() && self.exists_in(&self.handlers, &key, self.case_sensitive)
    }

    /// [`Settings::exists`] with per-call overrides.
    ///
    /// Fails only when an ad-hoc handler list cannot be built.
    pub fn exists_with(&self, key: impl Into<SettingKey>, options: &ExistsOptions) -> Result<bool> {
        let key = key.into();
        if key.is_empty() {
            return Ok(false);
        }

        let case_sensitive = options.case_sensitive.unwrap_or(self.case_sensitive);
        match &options.handlers {
            Some(specs) => {
                let handlers = self.registry.build_all(specs)?;
                Ok(self.exists_in(&handlers, &key, case_sensitive))
            }
            None => Ok(self.exists_in(&self.handlers, &key, case_sensitive)),
        }
    }

    /// Resolve `key` with the configured defaults.
    pub fn get(&self, key: impl Into<SettingKey>) -> Result<Value> {
        self.get_with(key, &GetOptions::default())
    }

    /// Resolve `key` with per-call overrides.
    ///
    /// # Errors
    ///
    /// - [`crate::SettingsError::MissingKey`] when a `Raise` action fires.
    /// - Handler construction errors when `options` carries an ad-hoc handler list.
    pub fn get_with(&self, key: impl Into<SettingKey>, options: &GetOptions) -> Result<Value> {
        let key = key.into();
        if key.is_empty() {
            return Ok(Value::Null);
        }

        let case_sensitive = options.case_sensitive.unwrap_or(self.case_sensitive);
        let found = match &options.handlers {
            Some(specs) => {
                let handlers = self.registry.build_all(specs)?;
                Self::first_match(&handlers, &key, case_sensitive)
            }
            None => Self::first_match(&self.handlers, &key, case_sensitive),
        };

        match found {
            Some(value) if options.coerce => Ok(self.coercer.coerce(value)),
            Some(value) => Ok(value),
            None => self.handle_missing_key(&key, options),
        }
    }

    fn exists_in(
        &self,
        handlers: &[Arc<dyn SettingHandler>],
        key: &SettingKey,
        case_sensitive: bool,
    ) -> bool {
        handlers
            .iter()
            .any(|handler| handler.exists(key, case_sensitive))
    }

    fn first_match(
        handlers: &[Arc<dyn SettingHandler>],
        key: &SettingKey,
        case_sensitive: bool,
    ) -> Option<Value> {
        handlers.iter().find_map(|handler| {
            let value = handler.get(key, case_sensitive)?;
            tracing::trace!(handler = handler.name(), key = %key, "setting resolved");
            Some(value)
        })
    }

    fn handle_missing_key(&self, key: &SettingKey, options: &GetOptions) -> Result<Value> {
        let key = key.to_string();
        let actions = options
            .on_missing_key
            .as_deref()
            .unwrap_or(&self.on_missing_key);
        for action in actions {
            action.run(&key)?;
        }

        let default = options.default.as_ref().unwrap_or(&self.default_value);
        Ok(default.resolve(&key))
    }
}
