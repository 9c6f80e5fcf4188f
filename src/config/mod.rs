//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `CHOREWHEEL` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use chorewheel::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! config.logging.init();
//! ```

mod defaults;
mod error;
mod logging;
mod storage;

pub use defaults::DefaultsConfig;
pub use error::{ConfigError, ConfigValidationError};
pub use logging::LoggingConfig;
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has working defaults; an empty environment yields a
/// development setup (in-memory storage, manual verification, `info`
/// logging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Document store selection
    #[serde(default)]
    pub storage: StorageConfig,

    /// Tenant defaults and audit retention
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads a `.env` file if present, then reads variables with the
    /// `CHOREWHEEL` prefix, `__` separating nested values:
    ///
    /// - `CHOREWHEEL__STORAGE__BACKEND=file` -> `storage.backend = File`
    /// - `CHOREWHEEL__DEFAULTS__POINT_MULTIPLIER=1.5`
    /// - `CHOREWHEEL__LOGGING__FILTER=chorewheel=debug`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected
    /// types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CHOREWHEEL")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ConfigValidationError` if any configuration value is
    /// semantically invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.storage.validate()?;
        self.defaults.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
