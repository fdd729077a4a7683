//! VM configuration
//!
//! Settings are plain data with serde support so a host can load them from
//! JSON alongside its own configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::call_frame::STACK_MAX;

/// Errors raised while loading or validating a [`VmConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed
    #[error("invalid VM configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// The operand stack cannot hold even the script's own slot
    #[error("stack capacity must be at least 1 slot")]
    ZeroStackCapacity,
}

/// Tunable VM settings
///
/// # Examples
///
/// ```
/// use interpreter::VmConfig;
///
/// let config = VmConfig::from_json(r#"{ "intern_concatenations": true }"#).unwrap();
/// assert!(config.intern_concatenations);
/// assert_eq!(config.stack_capacity, VmConfig::default().stack_capacity);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmConfig {
    /// Operand stack slots, reserved once when the VM is created
    pub stack_capacity: usize,
    /// Intern the results of string concatenation
    pub intern_concatenations: bool,
    /// Write runtime error reports to the error sink
    pub report_to_stderr: bool,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            stack_capacity: STACK_MAX,
            intern_concatenations: false,
            report_to_stderr: true,
        }
    }
}

impl VmConfig {
    /// Parse and validate a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stack_capacity == 0 {
            return Err(ConfigError::ZeroStackCapacity);
        }
        Ok(())
    }
}
