//! Configuration for a dispatch call
//!
//! Replaces any process-wide parser state: everything the dispatcher needs
//! besides the command table is carried in one explicitly passed value.

use crate::error::DispatchError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable that enables debug logging in the binary
pub const DEBUG_ENV_VAR: &str = "SUBCMD_DEBUG";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Program name shown in usage lines and examples
    pub program: String,
    /// Version printed by `--version`
    pub version: String,
    /// Enable debug logging
    pub debug: bool,
}

impl DispatchConfig {
    /// Create a configuration with an explicit program name
    pub fn new(program: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            version: version.into(),
            debug: false,
        }
    }

    /// Create configuration from the running process
    ///
    /// The program name is the basename of argv[0]; debug logging is enabled
    /// when `SUBCMD_DEBUG` is set to anything but `0` or an empty string.
    pub fn from_env(version: impl Into<String>) -> Result<Self, DispatchError> {
        let program = std::env::args_os()
            .next()
            .as_deref()
            .and_then(|arg0| Path::new(arg0).file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| DispatchError::config("cannot determine program name"))?;

        let debug = std::env::var(DEBUG_ENV_VAR)
            .map(|value| !value.is_empty() && value != "0")
            .unwrap_or(false);

        let config = Self {
            debug,
            ..Self::new(program, version)
        };
        config.validate()?;
        Ok(config)
    }

    /// Enable or disable debug logging
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.program.trim().is_empty() {
            return Err(DispatchError::config("program name must not be empty"));
        }

        if self.version.trim().is_empty() {
            return Err(DispatchError::config("version must not be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_complete_config() {
        let config = DispatchConfig::new("tool", "1.0.0");
        assert!(config.validate().is_ok());
        assert!(!config.debug);
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        let err = DispatchConfig::new("", "1.0.0").validate().unwrap_err();
        assert!(matches!(err, DispatchError::Config { .. }));

        let err = DispatchConfig::new("tool", " ").validate().unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: version must not be empty");
    }

    #[test]
    fn test_from_env_uses_executable_name() {
        let config = DispatchConfig::from_env("0.1.0").unwrap();
        assert!(!config.program.is_empty());
        assert!(!config.program.contains('/'));
        assert_eq!(config.version, "0.1.0");
    }
}
