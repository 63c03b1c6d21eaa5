//! Telemetry error types.

use thiserror::Error;

/// Errors raised while setting up telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The log filter did not parse or a global subscriber was already set.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),
}

/// Result alias for telemetry setup.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TelemetryError::LoggingInit("bad level".to_string());
        assert_eq!(err.to_string(), "failed to initialize logging: bad level");
    }
}
