//! Layered configuration loading.
//!
//! Later layers win: defaults, then a TOML or JSON file, then
//! `PREFIX__SECTION__KEY` environment variables. Validation runs last.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use abacus_telemetry::LogFormat;

use crate::{AbacusConfig, ConfigError};

/// Default environment prefix.
pub const ENV_PREFIX: &str = "ABACUS";

/// Builds an [`AbacusConfig`] from layered sources.
///
/// # Example
///
/// ```no_run
/// use abacus_config::ConfigLoader;
///
/// # fn main() -> Result<(), abacus_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_optional_file("abacus.toml")?
///     .with_env_prefix("ABACUS")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: AbacusConfig,
    env_prefix: Option<String>,
    env_vars: Option<Vec<(String, String)>>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Starts from the built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: AbacusConfig::default(),
            env_prefix: None,
            env_vars: None,
        }
    }

    /// Starts from [`AbacusConfig::development`].
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = AbacusConfig::development();
        self
    }

    /// Starts from [`AbacusConfig::production`].
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = AbacusConfig::production();
        self
    }

    /// Replaces the current values with a `.toml` or `.json` file.
    ///
    /// Keys missing from the file take their defaults.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

        self.config = parse(&content, &format)?;
        Ok(self)
    }

    /// Like [`with_file`](Self::with_file), but a missing file is skipped.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Replaces the current values with `content` in the given format.
    ///
    /// ```
    /// use abacus_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string("[calculator]\nprecision = 2", "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.calculator.precision, 2);
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = parse(content, &format.to_lowercase())?;
        Ok(self)
    }

    /// Enables `PREFIX__SECTION__KEY` overrides.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Reads overrides from `vars` instead of the process environment.
    #[must_use]
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Loads `.env` from the working directory, if present.
    ///
    /// Variables already set in the process take precedence.
    #[must_use]
    pub fn with_dotenv(self) -> Self {
        // A missing .env is the normal case.
        let _ = dotenvy::dotenv();
        self
    }

    /// Applies environment overrides, validates, and returns the result.
    pub fn load(mut self) -> Result<AbacusConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            let vars = self.env_vars.take().unwrap_or_else(|| env::vars().collect());
            for (key, value) in vars {
                self.apply_env_var(&prefix, &key, &value)?;
            }
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Returns the current values without overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> AbacusConfig {
        self.config
    }

    fn apply_env_var(&mut self, prefix: &str, key: &str, value: &str) -> Result<(), ConfigError> {
        let Some(rest) = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
        else {
            return Ok(());
        };

        let parts: Vec<&str> = rest.split("__").collect();

        match parts.as_slice() {
            ["SERVER", "HTTP_ADDR"] => {
                self.config.server.http_addr = value.to_string();
            }
            ["SERVER", "REQUEST_TIMEOUT_MS"] => {
                self.config.server.request_timeout_ms = parse_number(key, value)?;
            }
            ["SERVER", "SHUTDOWN_TIMEOUT_SECS"] => {
                self.config.server.shutdown_timeout_secs = parse_number(key, value)?;
            }
            ["STORE", "PERSIST"] => {
                self.config.store.persist = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["STORE", "PATH"] => {
                self.config.store.path = PathBuf::from(value);
            }
            ["CALCULATOR", "PRECISION"] => {
                self.config.calculator.precision = parse_number(key, value)?;
            }
            ["LOGGING", "ENABLED"] => {
                self.config.logging.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["LOGGING", "LEVEL"] => {
                self.config.logging.level = value.to_string();
            }
            ["LOGGING", "FORMAT"] => {
                self.config.logging.format = value
                    .parse::<LogFormat>()
                    .map_err(|reason| ConfigError::env_parse_error(key, reason))?;
            }
            _ => {}
        }

        Ok(())
    }
}

fn parse(content: &str, format: &str) -> Result<AbacusConfig, ConfigError> {
    match format {
        "toml" => Ok(toml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::env_parse_error(key, "expected a non-negative integer"))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
