//! VM configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default operand stack capacity.
pub const STACK_SIZE: usize = 2048;

/// Virtual machine configuration.
///
/// Hosts may load this from any serde format; missing fields take their
/// defaults and unknown fields are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VmConfig {
    /// Maximum number of values on the operand stack.
    pub stack_capacity: usize,
}

impl VmConfig {
    /// Configuration with the given stack capacity.
    pub fn with_stack_capacity(stack_capacity: usize) -> Self {
        Self { stack_capacity }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stack_capacity == 0 {
            return Err(ConfigError::InvalidStackCapacity {
                capacity: self.stack_capacity,
            });
        }
        Ok(())
    }
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            stack_capacity: STACK_SIZE,
        }
    }
}
