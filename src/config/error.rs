//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ConfigValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("File storage requires a data directory")]
    MissingDataDir,

    #[error("Point multiplier must be a positive number")]
    InvalidPointMultiplier,

    #[error("Audit buffer size must be at least 1")]
    InvalidAuditBufferSize,

    #[error("Invalid log filter directive")]
    InvalidLogFilter,
}
