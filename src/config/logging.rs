//! Logging configuration and tracing subscriber setup

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use super::ConfigValidationError;

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `chorewheel=debug,info`
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Emit JSON log lines instead of human-readable ones
    #[serde(default)]
    pub json: bool,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Validate the filter directive
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        EnvFilter::try_new(&self.filter).map_err(|_| ConfigValidationError::InvalidLogFilter)?;
        Ok(())
    }

    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` overrides the configured filter when set. Calling this
    /// twice panics, so it belongs in `main` only.
    pub fn init(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.filter));

        let builder = tracing_subscriber::fmt().with_env_filter(filter);
        if self.json {
            builder.json().init();
        } else {
            builder.init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_valid() {
        assert!(LoggingConfig::default().validate().is_ok());
    }

    #[test]
    fn garbage_filter_is_rejected() {
        let config = LoggingConfig {
            filter: "not==a==directive".to_string(),
            json: false,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn module_directives_are_accepted() {
        let config = LoggingConfig {
            filter: "chorewheel=debug,info".to_string(),
            json: true,
        };
        assert!(config.validate().is_ok());
    }
}
