//! Error types for cellwatch.
//!
//! All errors are strongly typed using thiserror. This enables pattern
//! matching on specific error conditions and provides clear error messages.
//! The monitoring core itself has no fatal condition: invalid inputs are
//! either rejected at construction time or handled as the Unknown sentinel.

use thiserror::Error;

/// Validation errors that occur during input validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Battery percentages are reported in the closed range 1..=100.
    #[error("Percentage {value} is out of range [1, 100]")]
    PercentageOutOfRange {
        /// The rejected raw value.
        value: u8,
    },
}

/// Errors surfaced by subscription streams.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The subscription was removed and its buffer drained.
    #[error("Subscription stream disconnected")]
    Disconnected,

    /// No event arrived within the requested window.
    #[error("No event within {duration_ms}ms")]
    Timeout {
        /// The elapsed wait in milliseconds.
        duration_ms: u64,
    },
}

/// Top-level error type for cellwatch operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MonitorError {
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A subscription stream operation failed.
    #[error(transparent)]
    Stream(#[from] StreamError),
}

/// Convenience result alias used throughout the crate.
pub type MonitorResult<T> = Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_error_message_names_the_value() {
        let err = ValidationError::PercentageOutOfRange { value: 0 };
        assert_eq!(err.to_string(), "Percentage 0 is out of range [1, 100]");
    }

    #[test]
    fn stream_errors_convert_into_monitor_error() {
        let err: MonitorError = StreamError::Disconnected.into();
        assert!(matches!(err, MonitorError::Stream(StreamError::Disconnected)));
    }
}
