//! Tests for the resolver configuration loader.
//!
//! Invariants:
//! - Tests use `serial_test` and `temp_env` so environment mutations never leak.
//! - Temporary directories are cleaned up automatically via `tempfile`.


use crate::constants::{
    ENV_ARRAY_SEPARATOR, ENV_CASE_SENSITIVE, ENV_COERCE_ARRAYS, ENV_COERCIONS, ENV_CONFIG_PATH,
    ENV_DEFAULT_VALUE, ENV_HANDLERS, ENV_ON_MISSING_KEY,
};
use crate::handlers::HandlerSpec;

/// Every loader variable unset, overridden by `vars`.
pub(super) fn loader_env<'a>(vars: &[(&'a str, &'a str)]) -> Vec<(&'a str, Option<&'a str>)> {
    let mut env: Vec<(&str, Option<&str>)> = [
        ENV_CONFIG_PATH,
        ENV_HANDLERS,
        ENV_CASE_SENSITIVE,
        ENV_ON_MISSING_KEY,
        ENV_DEFAULT_VALUE,
        ENV_COERCIONS,
        ENV_COERCE_ARRAYS,
        ENV_ARRAY_SEPARATOR,
    ]
    .into_iter()
    .filter(|name| !vars.iter().any(|(set, _)| set == name))
    .map(|name| (name, None))
    .collect();
    env.extend(vars.iter().map(|(name, value)| (*name, Some(*value))));
    env
}

pub(super) fn handler_names(specs: &[HandlerSpec]) -> Vec<String> {
    specs
        .iter()
        .map(|spec| match spec {
            HandlerSpec::Named { name, .. } => name.clone(),
            HandlerSpec::Instance(handler) => handler.name().to_string(),
        })
        .collect()
}
