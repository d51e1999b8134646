//! Constant-table handler.
//!
//! Resolves `Container::Path::MEMBER` keys against constants registered at
//! startup. The container path must match exactly; only the trailing member
//! name is tried in each case variant. An unknown container or member is
//! "not found", never an error.

use std::collections::BTreeMap;

use serde_json::Value;

use super::SettingHandler;
use crate::constants::CONSTANT_KEY_NESTING_SEPARATOR;
use crate::key::{SettingKey, normalize, variants};

/// Container path of constants defined without a namespace.
const ROOT_NAMESPACE: &str = "";

/// Resolves settings from a table of named constants.
#[derive(Debug, Clone, Default)]
pub struct ConstantsHandler {
    namespaces: BTreeMap<String, BTreeMap<String, Value>>,
}

impl ConstantsHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constant, e.g. `define("Billing::Plans::TRIAL_DAYS", 14)`.
    ///
    /// A path without `::` defines a root-level constant.
    pub fn define(&mut self, path: &str, value: impl Into<Value>) {
        let mut segments: Vec<&str> = path.split(CONSTANT_KEY_NESTING_SEPARATOR).collect();
        let member = segments.pop().unwrap_or_default().to_string();
        let container = segments.join(CONSTANT_KEY_NESTING_SEPARATOR);

        self.namespaces
            .entry(container)
            .or_default()
            .insert(member, value.into());
    }

    /// Builder form of [`ConstantsHandler::define`].
    pub fn with_constant(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.define(path, value);
        self
    }

    pub fn len(&self) -> usize {
        self.namespaces.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SettingHandler for ConstantsHandler {
    fn name(&self) -> &str {
        "constants"
    }

    fn get(&self, key: &SettingKey, case_sensitive: bool) -> Option<Value> {
        let segments = normalize(key, CONSTANT_KEY_NESTING_SEPARATOR);
        let (member, container) = segments.split_last()?;

        let container = if container.is_empty() {
            ROOT_NAMESPACE.to_string()
        } else {
            container.join(CONSTANT_KEY_NESTING_SEPARATOR)
        };
        let members = self.namespaces.get(&container)?;

        variants(std::slice::from_ref(member), case_sensitive)
            .into_iter()
            .filter_map(|variant| variant.into_iter().next())
            .find_map(|name| members.get(&name).filter(|value| !value.is_null()))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn handler() -> ConstantsHandler {
        ConstantsHandler::new()
            .with_constant("App::Handlers::ConstantsTest::TEST_CONST", "test")
            .with_constant(
                "App::Handlers::ConstantsTest::TEST_CONST_FALSE_VALUE",
                false,
            )
            .with_constant("GLOBAL_LIMIT", 10)
            .with_constant("App::UNSET", Value::Null)
    }

    #[test]
    fn test_class_constant_case_insensitive() {
        let handler = handler();

        for key in [
            "App::Handlers::ConstantsTest::TEST_CONST",
            "App::Handlers::ConstantsTest::Test_Const",
            "App::Handlers::ConstantsTest::test_const",
        ] {
            assert_eq!(
                handler.get(&key.into(), false),
                Some(json!("test")),
                "key {key}"
            );
            assert!(handler.exists(&key.into(), false), "key {key}");
        }
    }

    #[test]
    fn test_class_constant_case_sensitive() {
        let handler = handler();

        assert_eq!(
            handler.get(&"App::Handlers::ConstantsTest::TEST_CONST".into(), true),
            Some(json!("test"))
        );
        assert_eq!(
            handler.get(&"App::Handlers::ConstantsTest::Test_Const".into(), true),
            None
        );
        assert!(!handler.exists(
            &"App::Handlers::ConstantsTest::test_const".into(),
            true
        ));
    }

    #[test]
    fn test_false_valued_constant_is_defined() {
        let handler = handler();
        let key = "App::Handlers::ConstantsTest::TEST_CONST_FALSE_VALUE";

        assert!(handler.exists(&key.into(), true));
        assert_eq!(handler.get(&key.into(), true), Some(json!(false)));
        assert_eq!(
            handler.get(
                &"App::Handlers::ConstantsTest::test_const_false_value".into(),
                false
            ),
            Some(json!(false))
        );
        assert!(
            !handler.exists(
                &"App::Handlers::ConstantsTest::Test_Const_False_Value".into(),
                true
            )
        );
    }

    #[test]
    fn test_global_constant() {
        let handler = handler();

        assert_eq!(handler.get(&"GLOBAL_LIMIT".into(), true), Some(json!(10)));
        assert_eq!(handler.get(&"global_limit".into(), false), Some(json!(10)));
        assert_eq!(handler.get(&"global_limit".into(), true), None);
    }

    #[test]
    fn test_container_resolution_is_case_exact() {
        let handler = handler();

        assert_eq!(
            handler.get(&"app::handlers::constantstest::TEST_CONST".into(), false),
            None
        );
        assert_eq!(handler.get(&"Missing::TEST_CONST".into(), false), None);
    }

    #[test]
    fn test_null_constant_is_absent() {
        let handler = handler();
        assert!(!handler.exists(&"App::UNSET".into(), false));
    }

    #[test]
    fn test_len_counts_every_namespace() {
        assert_eq!(handler().len(), 4);
        assert!(ConstantsHandler::new().is_empty());
    }
}
