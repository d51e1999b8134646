//! Integration tests for structured exit codes.
//!
//! These tests verify that usettings returns the correct exit codes
//! for different outcomes, enabling reliable shell scripting.

mod common;

use common::usettings_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_raise_returns_exit_code_2() {
    usettings_cmd()
        .args([
            "--handler",
            "env",
            "get",
            "us_cli_missing.key",
            "--on-missing-key",
            "raise",
            "--default",
            "never-printed",
        ])
        .assert()
        .code(2)
        .stdout("")
        .stderr(predicate::str::contains(
            "No matches found for 'us_cli_missing.key'",
        ));
}

#[test]
fn test_exists_exit_codes() {
    usettings_cmd()
        .env("US_CLI_PRESENT", "")
        .args(["--handler", "env", "exists", "us_cli_present"])
        .assert()
        .code(0)
        .stdout("true\n");

    usettings_cmd()
        .args(["--handler", "env", "exists", "us_cli_not_there"])
        .assert()
        .code(2)
        .stdout("false\n");
}

#[test]
fn test_unknown_handler_returns_exit_code_1() {
    usettings_cmd()
        .args(["--handler", "vault", "get", "a"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unsupported handler 'vault'"));
}

#[test]
fn test_unknown_action_returns_exit_code_1() {
    usettings_cmd()
        .args(["--handler", "env", "get", "a", "--on-missing-key", "shout"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown on_missing_key action: 'shout'"));
}

#[test]
fn test_invalid_environment_returns_exit_code_1() {
    usettings_cmd()
        .env("UNIFIED_SETTINGS_CASE_SENSITIVE", "sometimes")
        .args(["get", "a"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("UNIFIED_SETTINGS_CASE_SENSITIVE"));
}

#[test]
fn test_invalid_dotenv_fails_without_leaking_secrets() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(".env"),
        "US_CLI_TOKEN=\"unterminated super-secret-token\n",
    )
    .unwrap();

    usettings_cmd()
        .current_dir(temp_dir.path())
        .env_remove("DOTENV_DISABLED")
        .args(["--handler", "env", "exists", "anything"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(".env"))
        .stderr(predicate::str::contains("super-secret-token").not());
}

#[test]
fn test_dotenv_values_reach_the_env_handler() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(".env"), "US_CLI_FROM_DOTENV=42\n").unwrap();

    usettings_cmd()
        .current_dir(temp_dir.path())
        .env_remove("DOTENV_DISABLED")
        .args(["--handler", "env", "get", "us_cli_from_dotenv", "-o", "json"])
        .assert()
        .success()
        .stdout("42\n");
}
