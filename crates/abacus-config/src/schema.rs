//! Configuration schema types.
//!
//! Every field has a serde default, so a file only needs the keys it
//! changes. Unknown keys are rejected.

use std::path::PathBuf;
use std::time::Duration;

use abacus_telemetry::LogFormat;
use serde::{Deserialize, Serialize};

/// `[server]` section.
///
/// # Example
///
/// ```
/// use abacus_config::ServerConfig;
///
/// let config = ServerConfig {
///     http_addr: "0.0.0.0:8080".to_string(),
///     request_timeout_ms: 2_000,
///     shutdown_timeout_secs: 5,
/// };
/// assert_eq!(config.request_timeout().as_secs(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// HTTP bind address.
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    /// Deadline for reading a request body and producing the response.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// How long shutdown waits for in-flight connections.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

impl ServerConfig {
    /// `request_timeout_ms` as a `Duration`.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// `shutdown_timeout_secs` as a `Duration`.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            request_timeout_ms: default_request_timeout(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

fn default_http_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_request_timeout() -> u64 {
    5_000
}

fn default_shutdown_timeout() -> u64 {
    10
}

/// `[store]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Load results at startup and save them on shutdown.
    #[serde(default)]
    pub persist: bool,

    /// JSON snapshot location.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            persist: false,
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./results.json")
}

/// Largest supported number of decimal places.
pub const MAX_PRECISION: u32 = 15;

/// `[calculator]` section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CalculatorConfig {
    /// Decimal places for rounding and expressions.
    #[serde(default = "default_precision")]
    pub precision: u32,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
        }
    }
}

fn default_precision() -> u32 {
    4
}

/// `[logging]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Install a log subscriber.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive, e.g. `info`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `json` or `pretty`.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::Json,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
