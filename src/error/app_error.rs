use crate::error::auth_error::AuthError;
use crate::models::booking::BookingStatus;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage unavailable")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Storage unavailable")]
    Redis {
        message: String,
        #[source]
        source: redis::RedisError,
    },
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Malformed stored value")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),
    #[error("Unknown day: {0}")]
    UnknownDay(String),
    #[error("Unknown slot: {0}")]
    UnknownSlot(String),
    #[error("Invalid time: {0}")]
    InvalidTime(String),
    #[error("Booking cannot move from {from} to {to}")]
    InvalidTransition { from: BookingStatus, to: BookingStatus },
    #[error("Lock duration of {0} minutes cannot be applied")]
    InvalidLockDuration(i64),
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),
    #[error("Configuration error")]
    ConfigurationError {
        message: String,
        #[source]
        source: figment::Error,
    },
}

impl AppError {
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    pub fn redis(message: impl Into<String>, source: redis::RedisError) -> Self {
        Self::Redis {
            message: message.into(),
            source,
        }
    }

    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::io("I/O error", e)
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::redis("Redis error", e)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::serialization("JSON error", e)
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::ConfigurationError {
            message: "Failed to read configuration".to_string(),
            source: e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn wrapped_errors_keep_their_source() {
        let err = AppError::io("reading store", std::io::Error::other("disk gone"));
        assert_eq!(err.to_string(), "Storage unavailable");
        assert_eq!(err.source().map(|s| s.to_string()), Some("disk gone".to_string()));
    }

    #[test]
    fn transition_error_names_both_states() {
        let err = AppError::InvalidTransition {
            from: BookingStatus::Completed,
            to: BookingStatus::Pending,
        };
        assert_eq!(err.to_string(), "Booking cannot move from completed to pending");
    }

    #[test]
    fn figment_errors_become_configuration_errors() {
        let err = AppError::from(figment::Error::from("missing field".to_string()));
        assert!(matches!(err, AppError::ConfigurationError { .. }));
        assert!(err.source().is_some());
    }
}
