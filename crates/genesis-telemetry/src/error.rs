//! Telemetry error types.

use thiserror::Error;

/// Errors raised while installing the log subscriber.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The filter directive could not be parsed.
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter {
        /// The directive as configured.
        directive: String,
        /// Parser message.
        reason: String,
    },

    /// A global subscriber is already installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = TelemetryError::InvalidFilter {
            directive: "info,,=".into(),
            reason: "bad".into(),
        };
        assert!(err.to_string().contains("info,,="));

        let err = TelemetryError::LoggingInit("already set".into());
        assert_eq!(err.to_string(), "Failed to initialize logging: already set");
    }
}
