use crate::config::error::ConfigError;
use thiserror::Error;

/// Crate-wide error type covering every way a notification or metrics call
/// can fail before it is swallowed at the [`Notifier`](crate::notify::Notifier)
/// boundary.
#[derive(Error, Debug)]
pub enum AppError {
    /// The payload could not be turned into JSON
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Network, connection or protocol failure while talking to a transport
    #[error("Transport error during {operation}")]
    Transport {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// The remote side answered, but with a failure
    #[error("Request rejected with status {status}: {code}: {message}")]
    Rejected {
        status: u16,
        code: String,
        message: String,
    },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Wraps a transport-level failure with the operation it interrupted
    pub fn transport(operation: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        AppError::Transport {
            operation: operation.into(),
            source: source.into(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        let operation = match error.url() {
            Some(url) => format!("request to {}", url),
            None => "request".to_string(),
        };
        AppError::Transport {
            operation,
            source: error.into(),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = match &error {
            ConfigError::ValidationError { field, .. } => field.clone(),
            _ => "settings".to_string(),
        };
        AppError::Configuration {
            key,
            source: error.into(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
