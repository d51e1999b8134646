//! Shared test utilities for usettings integration tests.
//!
//! Invariants / Assumptions:
//! - Every command is hermetic: no `.env` loading, no inherited
//!   `UNIFIED_SETTINGS_*` variables.

use assert_cmd::Command;

/// Returns a hermetic `usettings` command for integration testing.
pub fn usettings_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("usettings");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");

    for (key, _) in std::env::vars() {
        if key.starts_with("UNIFIED_SETTINGS_") {
            cmd.env_remove(&key);
        }
    }
    cmd.env_remove("RUST_LOG");

    cmd
}
