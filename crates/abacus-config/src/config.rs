//! Root configuration type.

use abacus_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

use crate::schema::{CalculatorConfig, LoggingConfig, ServerConfig, StoreConfig, MAX_PRECISION};
use crate::ConfigError;

/// Complete service configuration.
///
/// # Example
///
/// ```
/// use abacus_config::AbacusConfig;
///
/// let config = AbacusConfig::default();
/// assert_eq!(config.server.http_addr, "127.0.0.1:8080");
/// assert_eq!(config.calculator.precision, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AbacusConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Result store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Arithmetic settings.
    #[serde(default)]
    pub calculator: CalculatorConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AbacusConfig {
    /// Defaults with pretty debug logging.
    #[must_use]
    pub fn development() -> Self {
        Self {
            logging: LoggingConfig {
                enabled: true,
                level: "debug".to_string(),
                format: LogFormat::Pretty,
            },
            ..Self::default()
        }
    }

    /// Defaults with JSON info logging and persistence on.
    #[must_use]
    pub fn production() -> Self {
        Self {
            store: StoreConfig {
                persist: true,
                ..StoreConfig::default()
            },
            ..Self::default()
        }
    }

    /// Checks values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.http_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }

        if self.server.request_timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "server.request_timeout_ms",
                "must be greater than zero",
            ));
        }

        if self.server.shutdown_timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "server.shutdown_timeout_secs",
                "must be greater than zero",
            ));
        }

        if self.store.persist && self.store.path.as_os_str().is_empty() {
            return Err(ConfigError::invalid_value(
                "store.path",
                "must be set when persistence is enabled",
            ));
        }

        if self.calculator.precision > MAX_PRECISION {
            return Err(ConfigError::invalid_value(
                "calculator.precision",
                format!("must be at most {MAX_PRECISION}"),
            ));
        }

        if let Err(e) = abacus_telemetry::create_env_filter(&self.logging.level) {
            return Err(ConfigError::invalid_value("logging.level", e.to_string()));
        }

        Ok(())
    }

    /// The logging section as telemetry settings.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        let preset = match self.logging.format {
            LogFormat::Pretty => LogConfig::development(),
            LogFormat::Json => LogConfig::production(),
        };

        LogConfig {
            enabled: self.logging.enabled,
            level: self.logging.level.clone(),
            ..preset
        }
    }
}
