//! Setting keys and their case variants.
//!
//! Responsibilities:
//! - Represent a key as a delimited path or as pre-split segments.
//! - Split a key into segments for a handler-specific separator.
//! - Produce the case variants tried during lookup.
//!
//! Invariants:
//! - Case variants are derived per lookup and never stored.
//! - The as-given variant is always first so an exact-case match wins.

use std::fmt;

use serde_json::Value;

use crate::constants::KEY_NESTING_SEPARATOR;
use crate::error::SettingsError;

/// A logical configuration key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SettingKey {
    /// A delimited string such as `database.url` or `App::TIMEOUT`.
    Path(String),
    /// A key that is already split into segments.
    Segments(Vec<String>),
}

impl SettingKey {
    /// True for an absent or empty key. Such keys never reach a handler.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Path(path) => path.is_empty(),
            Self::Segments(segments) => segments.is_empty(),
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.write_str(path),
            Self::Segments(segments) => f.write_str(&segments.join(KEY_NESTING_SEPARATOR)),
        }
    }
}

impl From<&str> for SettingKey {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for SettingKey {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<&String> for SettingKey {
    fn from(path: &String) -> Self {
        Self::Path(path.clone())
    }
}

impl From<Vec<String>> for SettingKey {
    fn from(segments: Vec<String>) -> Self {
        Self::Segments(segments)
    }
}

impl From<&[&str]> for SettingKey {
    fn from(segments: &[&str]) -> Self {
        Self::Segments(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for SettingKey {
    fn from(segments: [&str; N]) -> Self {
        Self::Segments(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl From<&SettingKey> for SettingKey {
    fn from(key: &SettingKey) -> Self {
        key.clone()
    }
}

/// `None` is the absent key.
impl<T: Into<SettingKey>> From<Option<T>> for SettingKey {
    fn from(key: Option<T>) -> Self {
        key.map(Into::into)
            .unwrap_or_else(|| Self::Segments(Vec::new()))
    }
}

impl TryFrom<&Value> for SettingKey {
    type Error = SettingsError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(path) => Ok(Self::Path(path.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(segment) => Ok(segment.clone()),
                    other => Err(SettingsError::InvalidKeyKind {
                        kind: value_kind(other),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Segments),
            other => Err(SettingsError::InvalidKeyKind {
                kind: value_kind(other),
            }),
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Split a key into its segments.
///
/// Paths are split on `separator`; pre-split keys are returned unchanged.
pub fn normalize(key: &SettingKey, separator: &str) -> Vec<String> {
    match key {
        SettingKey::Path(path) if path.is_empty() => Vec::new(),
        SettingKey::Path(path) => path.split(separator).map(str::to_string).collect(),
        SettingKey::Segments(segments) => segments.clone(),
    }
}

/// Split a dynamically typed key. Anything but a string or string array is rejected.
pub fn normalize_value(key: &Value, separator: &str) -> Result<Vec<String>, SettingsError> {
    Ok(normalize(&SettingKey::try_from(key)?, separator))
}

/// Case variants to try, in order: as given, then upper, then lower.
pub fn variants(segments: &[String], case_sensitive: bool) -> Vec<Vec<String>> {
    let as_given = segments.to_vec();
    if case_sensitive {
        return vec![as_given];
    }

    let upper = segments.iter().map(|s| s.to_uppercase()).collect();
    let lower = segments.iter().map(|s| s.to_lowercase()).collect();
    vec![as_given, upper, lower]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_splits_paths_on_separator() {
        let key = SettingKey::from("database.pool.size");
        assert_eq!(
            normalize(&key, "."),
            strings(&["database", "pool", "size"])
        );

        let key = SettingKey::from("App::Limits::TIMEOUT");
        assert_eq!(
            normalize(&key, "::"),
            strings(&["App", "Limits", "TIMEOUT"])
        );
    }

    #[test]
    fn test_normalize_keeps_segments_as_given() {
        let key = SettingKey::from(["a.b", "c"]);
        assert_eq!(normalize(&key, "."), strings(&["a.b", "c"]));
    }

    #[test]
    fn test_empty_and_absent_keys() {
        assert!(SettingKey::from("").is_empty());
        assert!(SettingKey::from(None::<&str>).is_empty());
        assert!(normalize(&SettingKey::from(""), ".").is_empty());
        assert!(!SettingKey::from(Some("a")).is_empty());
    }

    #[test]
    fn test_normalize_value_rejects_unsupported_kinds() {
        assert_eq!(
            normalize_value(&json!("a.b"), ".").unwrap(),
            strings(&["a", "b"])
        );
        assert_eq!(
            normalize_value(&json!(["a", "b"]), ".").unwrap(),
            strings(&["a", "b"])
        );

        let err = normalize_value(&json!(42), ".").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidKeyKind { kind: "number" }
        ));

        let err = normalize_value(&json!(["a", 1]), ".").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidKeyKind { kind: "number" }
        ));

        let err = normalize_value(&json!({"a": 1}), ".").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidKeyKind { kind: "object" }
        ));
    }

    #[test]
    fn test_variants_case_sensitive_yields_one() {
        let segments = strings(&["Foo", "bar"]);
        assert_eq!(variants(&segments, true), vec![segments.clone()]);
    }

    #[test]
    fn test_variants_case_insensitive_yields_three_in_order() {
        let segments = strings(&["Foo", "bar"]);
        assert_eq!(
            variants(&segments, false),
            vec![
                strings(&["Foo", "bar"]),
                strings(&["FOO", "BAR"]),
                strings(&["foo", "bar"]),
            ]
        );
    }

    #[test]
    fn test_display_joins_segments_with_dots() {
        assert_eq!(SettingKey::from(["a", "b"]).to_string(), "a.b");
        assert_eq!(SettingKey::from("A::B").to_string(), "A::B");
    }
}
