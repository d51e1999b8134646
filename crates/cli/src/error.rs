//! CLI exit codes for scripting and automation.
//!
//! Invariants:
//! - `KeyMissing` (2) is returned only when a key is absent: a `raise` action
//!   fired during `get`, or `exists` found nothing.
//! - Every other failure, including configuration errors, is `GeneralError` (1).

use unified_settings::SettingsError;

/// Structured exit codes for usettings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,

    /// Unhandled or configuration failure.
    GeneralError = 1,

    /// The key is not defined by any handler.
    KeyMissing = 2,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        let missing = self.chain().any(|cause| {
            matches!(
                cause.downcast_ref::<SettingsError>(),
                Some(SettingsError::MissingKey { .. })
            )
        });
        if missing {
            ExitCode::KeyMissing
        } else {
            ExitCode::GeneralError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_code_as_i32() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::KeyMissing.as_i32(), 2);
    }

    #[test]
    fn test_missing_key_maps_through_context() {
        let err = Err::<(), _>(SettingsError::MissingKey {
            key: "a".to_string(),
        })
        .context("Failed to resolve 'a'")
        .unwrap_err();

        assert_eq!(err.exit_code(), ExitCode::KeyMissing);
    }

    #[test]
    fn test_other_errors_are_general() {
        let err = anyhow::Error::new(SettingsError::NotConfigured);
        assert_eq!(err.exit_code(), ExitCode::GeneralError);

        let err = anyhow::anyhow!("boom");
        assert_eq!(err.exit_code(), ExitCode::GeneralError);
    }
}
