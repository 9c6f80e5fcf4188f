//! Tenant default configuration
//!
//! Applied to tenants that have not stored their own settings.

use serde::Deserialize;

use super::ConfigValidationError;

/// Defaults for tenant behavior and audit retention
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsConfig {
    /// Skip manual verification for all tenants without stored settings
    #[serde(default)]
    pub auto_approve: bool,

    /// Point multiplier for tenants without stored settings
    #[serde(default = "default_point_multiplier")]
    pub point_multiplier: f64,

    /// Capacity of the in-memory audit ring buffer
    #[serde(default = "default_audit_buffer_size")]
    pub audit_buffer_size: usize,
}

fn default_point_multiplier() -> f64 {
    1.0
}

fn default_audit_buffer_size() -> usize {
    1000
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            auto_approve: false,
            point_multiplier: default_point_multiplier(),
            audit_buffer_size: default_audit_buffer_size(),
        }
    }
}

impl DefaultsConfig {
    /// Validate default values
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.point_multiplier.is_finite() || self.point_multiplier <= 0.0 {
            return Err(ConfigValidationError::InvalidPointMultiplier);
        }
        if self.audit_buffer_size == 0 {
            return Err(ConfigValidationError::InvalidAuditBufferSize);
        }
        Ok(())
    }
}
