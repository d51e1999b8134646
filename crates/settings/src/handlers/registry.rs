//! Handler specifications and the factory registry that materializes them.
//!
//! Responsibilities:
//! - Describe a handler either by registered name plus parameters or as a
//!   pre-built instance.
//! - Parse specifications from strings (`name?key=value&key=value`) and from
//!   configuration files. Query keys and values are form-urlencoded, so `&`,
//!   `,` and `%` are written `%26`, `%2C` and `%25`, and `+` decodes to a space.
//! - Build concrete handlers through named factories.
//!
//! Invariants:
//! - Unknown handler names fail with `UnsupportedHandlerSpecification`.
//! - Unknown or malformed parameters fail with `InvalidHandlerParameter`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use url::form_urlencoded;

use super::{
    ConfigObjectHandler, ConstantsHandler, CredentialTable, CredentialsHandler, EnvHandler,
    HandlerKind, KeyringStore, SettingHandler,
};
use crate::constants::{DEFAULT_CONFIG_OBJECT_PATH, ENV_KEY_NESTING_SEPARATOR};
use crate::error::{Result, SettingsError};

/// Constructor parameters for a named handler.
pub type HandlerParams = BTreeMap<String, String>;

/// Builds a handler from its parameters.
pub type HandlerFactory =
    Arc<dyn Fn(&HandlerParams) -> Result<Arc<dyn SettingHandler>> + Send + Sync>;

/// How to obtain one handler of the resolver's ordered list.
#[derive(Clone)]
pub enum HandlerSpec {
    /// A registered handler name plus constructor parameters.
    Named { name: String, params: HandlerParams },
    /// An already constructed handler.
    Instance(Arc<dyn SettingHandler>),
}

impl HandlerSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            params: HandlerParams::new(),
        }
    }

    pub fn instance(handler: impl SettingHandler + 'static) -> Self {
        Self::Instance(Arc::new(handler))
    }

    /// Add a constructor parameter. No effect on instances.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Named { params, .. } = &mut self {
            params.insert(key.into(), value.into());
        }
        self
    }
}

impl fmt::Debug for HandlerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named { name, params } => f
                .debug_struct("Named")
                .field("name", name)
                .field("params", params)
                .finish(),
            Self::Instance(handler) => f.debug_tuple("Instance").field(&handler.name()).finish(),
        }
    }
}

impl From<HandlerKind> for HandlerSpec {
    fn from(kind: HandlerKind) -> Self {
        Self::named(kind.as_str())
    }
}

impl From<Arc<dyn SettingHandler>> for HandlerSpec {
    fn from(handler: Arc<dyn SettingHandler>) -> Self {
        Self::Instance(handler)
    }
}

impl FromStr for HandlerSpec {
    type Err = SettingsError;

    /// Parse `name` or `name?key=value&key=value`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (name, query) = s.split_once('?').unwrap_or((s, ""));
        if name.is_empty() {
            return Err(SettingsError::UnsupportedHandlerSpecification(
                s.to_string(),
            ));
        }

        if let Some(pair) = query
            .split('&')
            .find(|pair| !pair.is_empty() && !pair.contains('='))
        {
            return Err(SettingsError::InvalidHandlerParameter {
                handler: name.to_string(),
                param: pair.to_string(),
                message: "expected key=value".to_string(),
            });
        }

        let mut spec = Self::named(name);
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            spec = spec.with_param(key.trim(), value.trim());
        }
        Ok(spec)
    }
}

impl<'de> Deserialize<'de> for HandlerSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Short(String),
            Full {
                handler: String,
                #[serde(default)]
                params: HandlerParams,
            },
        }

        match Raw::deserialize(deserializer)? {
            Raw::Short(spec) => spec.parse().map_err(serde::de::Error::custom),
            Raw::Full { handler, params } => Ok(Self::Named {
                name: handler,
                params,
            }),
        }
    }
}

/// Named handler factories.
#[derive(Clone)]
pub struct HandlerRegistry {
    factories: BTreeMap<String, HandlerFactory>,
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("names", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlerRegistry {
    /// A registry with the built-in handlers.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(HandlerKind::Env.as_str(), build_env);
        registry.register(HandlerKind::Credentials.as_str(), build_credentials);
        registry.register(HandlerKind::Constants.as_str(), build_constants);
        registry.register(HandlerKind::ConfigObject.as_str(), build_config_object);
        registry
    }

    /// A registry with no factories at all.
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Register (or replace) a factory under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&HandlerParams) -> Result<Arc<dyn SettingHandler>> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve_name(name).is_some()
    }

    /// Built-in aliases (`environment`, `config_gem`, ...) map to their canonical names.
    fn resolve_name(&self, name: &str) -> Option<&HandlerFactory> {
        self.factories.get(name).or_else(|| {
            let kind = name.parse::<HandlerKind>().ok()?;
            self.factories.get(kind.as_str())
        })
    }

    pub fn build(&self, spec: &HandlerSpec) -> Result<Arc<dyn SettingHandler>> {
        match spec {
            HandlerSpec::Instance(handler) => Ok(Arc::clone(handler)),
            HandlerSpec::Named { name, params } => {
                let factory = self.resolve_name(name).ok_or_else(|| {
                    SettingsError::UnsupportedHandlerSpecification(name.clone())
                })?;
                factory(params)
            }
        }
    }

    /// Build every spec in order.
    pub fn build_all(&self, specs: &[HandlerSpec]) -> Result<Vec<Arc<dyn SettingHandler>>> {
        specs.iter().map(|spec| self.build(spec)).collect()
    }
}

fn check_params(handler: HandlerKind, params: &HandlerParams, allowed: &[&str]) -> Result<()> {
    match params.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(unknown) => Err(SettingsError::InvalidHandlerParameter {
            handler: handler.to_string(),
            param: unknown.clone(),
            message: format!("expected one of: {}", allowed.join(", ")),
        }),
        None => Ok(()),
    }
}

fn build_env(params: &HandlerParams) -> Result<Arc<dyn SettingHandler>> {
    check_params(HandlerKind::Env, params, &["prefix", "separator", "dotenv"])?;

    let mut handler = match params.get("dotenv") {
        Some(path) => EnvHandler::from_dotenv(path)?,
        None => EnvHandler::new(),
    };
    if let Some(prefix) = params.get("prefix") {
        handler = handler.with_prefix(prefix.as_str());
    }
    if let Some(separator) = params.get("separator") {
        handler = handler.with_separator(separator.as_str());
    }
    Ok(Arc::new(handler))
}

fn build_credentials(params: &HandlerParams) -> Result<Arc<dyn SettingHandler>> {
    check_params(
        HandlerKind::Credentials,
        params,
        &["path", "keyring_service"],
    )?;

    let handler = match (params.get("path"), params.get("keyring_service")) {
        (Some(_), Some(_)) => {
            return Err(SettingsError::InvalidHandlerParameter {
                handler: HandlerKind::Credentials.to_string(),
                param: "path".to_string(),
                message: "path and keyring_service are mutually exclusive".to_string(),
            });
        }
        (Some(path), None) => CredentialsHandler::new(CredentialTable::from_file(Path::new(path))?),
        (None, Some(service)) if service.is_empty() => {
            CredentialsHandler::new(KeyringStore::default())
        }
        (None, Some(service)) => CredentialsHandler::new(KeyringStore::new(service.as_str())),
        (None, None) => {
            tracing::debug!("credentials handler configured without a store; it will be empty");
            CredentialsHandler::default()
        }
    };
    Ok(Arc::new(handler))
}

fn build_constants(params: &HandlerParams) -> Result<Arc<dyn SettingHandler>> {
    check_params(HandlerKind::Constants, params, &[])?;
    Ok(Arc::new(ConstantsHandler::new()))
}

fn build_config_object(params: &HandlerParams) -> Result<Arc<dyn SettingHandler>> {
    check_params(
        HandlerKind::ConfigObject,
        params,
        &["path", "env_prefix", "env_separator"],
    )?;

    let path = params
        .get("path")
        .map(String::as_str)
        .unwrap_or(DEFAULT_CONFIG_OBJECT_PATH);
    let mut handler = ConfigObjectHandler::from_file(path)?;

    if let Some(prefix) = params.get("env_prefix") {
        let separator = params
            .get("env_separator")
            .map(String::as_str)
            .unwrap_or(ENV_KEY_NESTING_SEPARATOR);
        handler = handler.with_env(prefix, separator)?;
    }
    Ok(Arc::new(handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[derive(Debug)]
    struct Fixed(&'static str);

    impl SettingHandler for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn get(&self, _key: &crate::SettingKey, _case_sensitive: bool) -> Option<Value> {
            Some(json!(self.0))
        }
    }

    #[test]
    fn test_parse_spec_strings() {
        let spec: HandlerSpec = "credentials?path=secrets.json".parse().unwrap();
        match spec {
            HandlerSpec::Named { name, params } => {
                assert_eq!(name, "credentials");
                assert_eq!(params.get("path").map(String::as_str), Some("secrets.json"));
            }
            HandlerSpec::Instance(_) => panic!("expected a named spec"),
        }

        assert!(matches!(
            "env?prefix".parse::<HandlerSpec>(),
            Err(SettingsError::InvalidHandlerParameter { .. })
        ));
        assert!(matches!(
            "?a=b".parse::<HandlerSpec>(),
            Err(SettingsError::UnsupportedHandlerSpecification(_))
        ));
    }

    #[test]
    fn test_spec_parameters_are_percent_decoded() {
        let spec: HandlerSpec = "credentials?path=/srv/a%26b%2Cc%25.yml".parse().unwrap();
        let HandlerSpec::Named { params, .. } = spec else {
            panic!("expected a named spec");
        };
        assert_eq!(
            params.get("path").map(String::as_str),
            Some("/srv/a&b,c%.yml")
        );

        let spec: HandlerSpec = "env?prefix=APP_&separator=%3A%3A".parse().unwrap();
        let HandlerSpec::Named { params, .. } = spec else {
            panic!("expected a named spec");
        };
        assert_eq!(params.get("prefix").map(String::as_str), Some("APP_"));
        assert_eq!(params.get("separator").map(String::as_str), Some("::"));
    }

    #[test]
    fn test_deserialize_short_and_full_forms() {
        let specs: Vec<HandlerSpec> = serde_json::from_value(json!([
            "env",
            {"handler": "config_object", "params": {"path": "settings.toml"}}
        ]))
        .unwrap();

        assert!(matches!(
            &specs[0],
            HandlerSpec::Named { name, .. } if name == "env"
        ));
        assert!(matches!(
            &specs[1],
            HandlerSpec::Named { name, params } if name == "config_object" && params.len() == 1
        ));
    }

    #[test]
    fn test_builds_builtins_and_aliases() {
        let registry = HandlerRegistry::new();

        let handler = registry.build(&HandlerKind::Env.into()).unwrap();
        assert_eq!(handler.name(), "env");

        let handler = registry.build(&HandlerSpec::named("environment")).unwrap();
        assert_eq!(handler.name(), "env");
        assert!(registry.contains("config_gem"));
    }

    #[test]
    fn test_unknown_handler_name_is_unsupported() {
        let registry = HandlerRegistry::new();
        let err = registry.build(&HandlerSpec::named("vault")).unwrap_err();

        assert!(matches!(
            err,
            SettingsError::UnsupportedHandlerSpecification(name) if name == "vault"
        ));
    }

    #[test]
    fn test_unknown_parameter_is_rejected() {
        let registry = HandlerRegistry::new();
        let spec = HandlerSpec::named("env").with_param("prefx", "APP_");

        assert!(matches!(
            registry.build(&spec),
            Err(SettingsError::InvalidHandlerParameter { param, .. }) if param == "prefx"
        ));
    }

    #[test]
    fn test_instances_are_shared_not_rebuilt() {
        let registry = HandlerRegistry::empty();
        let handler: Arc<dyn SettingHandler> = Arc::new(Fixed("x"));
        let built = registry.build(&HandlerSpec::from(Arc::clone(&handler))).unwrap();

        assert!(Arc::ptr_eq(&handler, &built));
    }

    #[test]
    fn test_custom_factory() {
        let mut registry = HandlerRegistry::empty();
        registry.register("fixed", |params| {
            let value = if params.contains_key("loud") { "LOUD" } else { "quiet" };
            Ok(Arc::new(Fixed(value)) as Arc<dyn SettingHandler>)
        });

        let handler = registry
            .build(&HandlerSpec::named("fixed").with_param("loud", "1"))
            .unwrap();
        assert_eq!(handler.get(&"any".into(), false), Some(json!("LOUD")));
        assert!(!registry.contains("env"));
    }

    #[test]
    fn test_credentials_path_and_keyring_are_exclusive() {
        let spec = HandlerSpec::named("credentials")
            .with_param("path", "a.json")
            .with_param("keyring_service", "svc");

        assert!(matches!(
            HandlerRegistry::new().build(&spec),
            Err(SettingsError::InvalidHandlerParameter { .. })
        ));
    }
}
