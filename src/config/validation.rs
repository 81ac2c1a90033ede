//! Configuration validation logic
//!
//! This module provides validation methods for all configuration structures
//! to ensure configuration values are within acceptable ranges and formats.

use url::Url;

use crate::config::error::ConfigError;
use crate::config::settings::{
    ApplicationConfig, AwsConfig, FileSettings, HttpConfig, LoggerSettings, MetricsConfig,
    Settings,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Checks that `value` is an absolute http(s) URL
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::ValidationError {
        field: field.to_string(),
        message: format!("Invalid URL '{}': {}", value, e),
    })?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::ValidationError {
            field: field.to_string(),
            message: format!("URL must use http or https, got '{}'", url.scheme()),
        });
    }

    Ok(())
}

impl ApplicationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::validation(
                "application.name",
                "Application name cannot be empty.",
            ));
        }
        Ok(())
    }
}

impl MetricsConfig {
    /// Validate metrics configuration
    ///
    /// # Validation Rules
    /// - Nothing is checked while metrics are disabled
    /// - Solution id must not be empty
    /// - Endpoint must be an absolute http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        if self.solution_id.trim().is_empty() {
            return Err(ConfigError::validation(
                "metrics.solution_id",
                "Solution id is required when metrics are enabled.",
            ));
        }

        validate_http_url("metrics.endpoint_url", &self.endpoint_url)
    }
}

impl AwsConfig {
    /// Validate AWS configuration
    ///
    /// # Validation Rules
    /// - Region must not be empty
    /// - Access key id and secret access key are set together or not at all
    /// - An SNS endpoint override must be an absolute http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region.trim().is_empty() {
            return Err(ConfigError::validation(
                "aws.region",
                "Region cannot be empty.",
            ));
        }

        if self.access_key_id.is_some() != self.secret_access_key.is_some() {
            return Err(ConfigError::validation(
                "aws.secret_access_key",
                "access_key_id and secret_access_key must be configured together.",
            ));
        }

        if let Some(endpoint) = &self.sns_endpoint {
            validate_http_url("aws.sns_endpoint", endpoint)?;
        }

        Ok(())
    }
}

impl HttpConfig {
    /// Validate HTTP client configuration
    ///
    /// Configured timeouts must be greater than 0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_seconds == Some(0) {
            return Err(ConfigError::validation(
                "http.timeout_seconds",
                "Request timeout must be greater than 0 seconds when set.",
            ));
        }

        if self.connect_timeout_seconds == Some(0) {
            return Err(ConfigError::validation(
                "http.connect_timeout_seconds",
                "Connect timeout must be greater than 0 seconds when set.",
            ));
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.application.validate()?;
        self.logger.validate()?;
        self.metrics.validate()?;
        self.aws.validate()?;
        self.http.validate()?;
        Ok(())
    }
}
