//! Per-tenant behavior settings.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Tenant-level knobs consulted by the lifecycle engine and points ledger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TenantSettings {
    /// When true, completion skips manual verification entirely.
    pub auto_approve: bool,

    /// Multiplier applied to instance point values before awarding.
    pub point_multiplier: f64,
}

impl TenantSettings {
    /// Creates validated settings.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if the multiplier is not strictly positive
    pub fn new(auto_approve: bool, point_multiplier: f64) -> Result<Self, ValidationError> {
        if !point_multiplier.is_finite() || point_multiplier <= 0.0 {
            return Err(ValidationError::invalid_format(
                "point_multiplier",
                "must be a positive number",
            ));
        }
        Ok(Self {
            auto_approve,
            point_multiplier,
        })
    }
}

impl Default for TenantSettings {
    /// Manual verification, 1x points.
    fn default() -> Self {
        Self {
            auto_approve: false,
            point_multiplier: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_manual_verification_at_face_value() {
        let settings = TenantSettings::default();
        assert!(!settings.auto_approve);
        assert_eq!(settings.point_multiplier, 1.0);
    }

    #[test]
    fn rejects_non_positive_multiplier() {
        assert!(TenantSettings::new(false, 0.0).is_err());
        assert!(TenantSettings::new(false, -1.5).is_err());
        assert!(TenantSettings::new(false, f64::NAN).is_err());
    }

    #[test]
    fn accepts_fractional_multiplier() {
        let settings = TenantSettings::new(true, 1.5).unwrap();
        assert!(settings.auto_approve);
        assert_eq!(settings.point_multiplier, 1.5);
    }
}
