//! String to typed value coercion.
//!
//! Responsibilities:
//! - Convert raw string settings into nil, booleans, integers, floats, or arrays of those.
//! - Allow each coercion kind and array splitting to be disabled.
//!
//! Invariants:
//! - Non-string values pass through unchanged.
//! - Coercion kinds are attempted in the fixed order nil, boolean, integer, float,
//!   regardless of the order they were configured in.
//! - With array splitting enabled, any value containing the separator becomes an array.
//!   A value without the separator is never wrapped in a single-element array.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::constants::DEFAULT_ARRAY_SEPARATOR;
use crate::error::SettingsError;

/// A single kind of string coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoercionKind {
    Nil,
    Boolean,
    Integer,
    Float,
}

impl CoercionKind {
    /// Every kind, in attempt order.
    pub const ALL: [CoercionKind; 4] = [Self::Nil, Self::Boolean, Self::Integer, Self::Float];

    fn apply(self, value: &str) -> Option<Value> {
        match self {
            Self::Nil => value.eq_ignore_ascii_case("nil").then_some(Value::Null),
            Self::Boolean => {
                if value.eq_ignore_ascii_case("true") {
                    Some(Value::Bool(true))
                } else if value.eq_ignore_ascii_case("false") {
                    Some(Value::Bool(false))
                } else {
                    None
                }
            }
            Self::Integer => value.parse::<i64>().ok().map(Value::from),
            Self::Float => parse_float(value),
        }
    }
}

impl fmt::Display for CoercionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Nil => "nil",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
        };
        f.write_str(name)
    }
}

impl FromStr for CoercionKind {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nil" => Ok(Self::Nil),
            "boolean" => Ok(Self::Boolean),
            "integer" => Ok(Self::Integer),
            "float" => Ok(Self::Float),
            _ => Err(SettingsError::UnknownCoercion(s.to_string())),
        }
    }
}

/// Only plain decimal notation counts; `inf` and `NaN` stay strings.
///
/// A decimal point must be followed by a digit, so `1.` and `1.e5` stay strings.
fn parse_float(value: &str) -> Option<Value> {
    let plain = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !plain || !value.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let bare_point = value
        .split('.')
        .skip(1)
        .any(|fraction| !fraction.starts_with(|c: char| c.is_ascii_digit()));
    if bare_point {
        return None;
    }

    value
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

/// Strip ASCII whitespace and NUL from both ends. Other Unicode spaces are kept.
fn strip(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_ascii_whitespace() || matches!(c, '\0' | '\x0B'))
}

/// Converts raw string values into typed values.
#[derive(Debug, Clone, PartialEq)]
pub struct Coercer {
    coercions: Vec<CoercionKind>,
    coerce_arrays: bool,
    array_separator: char,
}

impl Default for Coercer {
    fn default() -> Self {
        Self::new()
    }
}

impl Coercer {
    /// All coercion kinds, array splitting on `,`.
    pub fn new() -> Self {
        Self {
            coercions: CoercionKind::ALL.to_vec(),
            coerce_arrays: true,
            array_separator: DEFAULT_ARRAY_SEPARATOR,
        }
    }

    /// A coercer that only trims strings.
    pub fn disabled() -> Self {
        Self::new().with_coercions([]).with_arrays(false)
    }

    /// Replace the enabled coercion kinds.
    pub fn with_coercions(mut self, coercions: impl IntoIterator<Item = CoercionKind>) -> Self {
        self.coercions = coercions.into_iter().collect();
        self
    }

    /// Enable or disable array splitting.
    pub fn with_arrays(mut self, enabled: bool) -> Self {
        self.coerce_arrays = enabled;
        self
    }

    /// Set the array separator character.
    pub fn with_array_separator(mut self, separator: char) -> Self {
        self.array_separator = separator;
        self
    }

    pub fn coercions(&self) -> &[CoercionKind] {
        &self.coercions
    }

    pub fn coerce_arrays(&self) -> bool {
        self.coerce_arrays
    }

    pub fn array_separator(&self) -> char {
        self.array_separator
    }

    /// Coerce a value. Only strings are touched.
    pub fn coerce(&self, value: Value) -> Value {
        let Value::String(raw) = value else {
            return value;
        };
        let trimmed = strip(&raw);

        if self.coerce_arrays && trimmed.contains(self.array_separator) {
            let mut parts: Vec<&str> = trimmed.split(self.array_separator).collect();
            while parts.last().is_some_and(|part| part.is_empty()) {
                parts.pop();
            }
            return Value::Array(
                parts
                    .into_iter()
                    .map(|part| self.coerce_single(strip(part)))
                    .collect(),
            );
        }

        self.coerce_single(trimmed)
    }

    fn coerce_single(&self, value: &str) -> Value {
        CoercionKind::ALL
            .into_iter()
            .filter(|kind| self.coercions.contains(kind))
            .find_map(|kind| kind.apply(value))
            .unwrap_or_else(|| Value::String(value.to_string()))
    }
}
