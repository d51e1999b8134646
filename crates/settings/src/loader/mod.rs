//! Resolver configuration loading from `.env` files, environment variables,
//! and JSON/YAML files.
//!
//! Responsibilities:
//! - Provide the builder-pattern [`SettingsConfigLoader`] for layered configuration.
//! - Enforce the `DOTENV_DISABLED` gate so tests never pick up a stray `.env`.
//!
//! Does NOT handle:
//! - Resolving settings (see `resolver.rs`).

mod builder;
mod env;
mod file;
mod layer;

#[cfg(test)]
mod tests;

pub use builder::SettingsConfigLoader;
pub use env::env_var_or_none;
