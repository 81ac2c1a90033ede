//! Configuration settings structures for efs-notify
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "efs-notify".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/efs-notify.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_solution_id() -> String {
    "SO0031".to_string()
}

fn default_metrics_endpoint() -> String {
    "https://metrics.awssolutionsbuilder.com/generic".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_user_agent() -> String {
    format!("efs-notify/{}", crate::pkg_version())
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Application version
    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Notification Configuration
// ============================================================================

/// Customer status notification configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NotificationConfig {
    /// Topic ARN used when a command does not name one explicitly
    #[serde(default)]
    pub topic_arn: String,
}

// ============================================================================
// Metrics Configuration
// ============================================================================

/// Anonymous usage metrics configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Whether anonymous metrics are sent at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Solution identifier reported with every metrics envelope
    #[serde(default = "default_solution_id")]
    pub solution_id: String,

    /// Anonymous deployment identifier; a random UUID is used when empty
    #[serde(default)]
    pub instance_id: String,

    /// Collector URL receiving the metrics POST
    #[serde(default = "default_metrics_endpoint")]
    pub endpoint_url: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            solution_id: default_solution_id(),
            instance_id: String::new(),
            endpoint_url: default_metrics_endpoint(),
        }
    }
}

// ============================================================================
// AWS Configuration
// ============================================================================

/// AWS access used by the SNS publisher
///
/// Credentials left unset here fall back to the standard `AWS_*` environment
/// variables when the publisher is built.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsConfig {
    /// Region used when a topic id carries none
    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default)]
    pub access_key_id: Option<String>,

    #[serde(default)]
    pub secret_access_key: Option<String>,

    #[serde(default)]
    pub session_token: Option<String>,

    /// Overrides the regional SNS endpoint (e.g. a VPC endpoint or a local stub)
    #[serde(default)]
    pub sns_endpoint: Option<String>,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            sns_endpoint: None,
        }
    }
}

impl fmt::Debug for AwsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsConfig")
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .field("sns_endpoint", &self.sns_endpoint)
            .finish()
    }
}

// ============================================================================
// HTTP Client Configuration
// ============================================================================

/// Shared HTTP client configuration
///
/// No timeout is applied unless one is configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Connect timeout in seconds
    #[serde(default)]
    pub connect_timeout_seconds: Option<u64>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            connect_timeout_seconds: None,
            user_agent: default_user_agent(),
        }
    }
}

// ============================================================================
// Logger Settings (compatible with LoggerConfig)
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert LoggerSettings to the runtime LoggerConfig
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console_config = self.console.into_console_config();
        let file_config = self.file.into_file_config()?;

        LoggerConfig::new(console_config, file_config, self.level).map_err(|e| {
            ConfigError::ValidationError {
                field: "logger".to_string(),
                message: e.to_string(),
            }
        })
    }
}

impl ConsoleSettings {
    pub fn into_console_config(self) -> ConsoleConfig {
        ConsoleConfig::new(self.enabled, self.colored)
    }
}

impl FileSettings {
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self.parse_format()?;

        FileConfig::new(self.enabled, PathBuf::from(self.path), self.append, format).map_err(
            |e| ConfigError::ValidationError {
                field: "logger.file".to_string(),
                message: e.to_string(),
            },
        )
    }

    fn parse_format(&self) -> Result<LogFormat, ConfigError> {
        self.format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: e.to_string(),
            })
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
///
/// This structure represents the entire configuration that can be loaded
/// from TOML files and environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub logger: LoggerSettings,

    #[serde(default)]
    pub notification: NotificationConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,

    #[serde(default)]
    pub aws: AwsConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_application_config() -> impl Strategy<Value = ApplicationConfig> {
        (
            "[a-z][a-z0-9-]{0,20}",
            "[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}",
        )
            .prop_map(|(name, version)| ApplicationConfig { name, version })
    }

    fn arb_logger_settings() -> impl Strategy<Value = LoggerSettings> {
        (
            prop_oneof![
                Just("trace".to_string()),
                Just("debug".to_string()),
                Just("info".to_string()),
                Just("warn".to_string()),
                Just("error".to_string()),
            ],
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            prop_oneof![
                Just("json".to_string()),
                Just("full".to_string()),
                Just("compact".to_string()),
            ],
        )
            .prop_map(|(level, console_enabled, colored, file_enabled, format)| {
                LoggerSettings {
                    level,
                    console: ConsoleSettings {
                        enabled: console_enabled,
                        colored,
                    },
                    file: FileSettings {
                        enabled: file_enabled,
                        format,
                        ..FileSettings::default()
                    },
                }
            })
    }

    fn arb_metrics_config() -> impl Strategy<Value = MetricsConfig> {
        (
            any::<bool>(),
            "SO[0-9]{4}",
            prop_oneof![Just(String::new()), "[a-f0-9]{8}-[a-f0-9]{4}"],
            prop_oneof![
                Just("https://metrics.example.com/generic".to_string()),
                Just("http://localhost:8080/m".to_string()),
            ],
        )
            .prop_map(|(enabled, solution_id, instance_id, endpoint_url)| MetricsConfig {
                enabled,
                solution_id,
                instance_id,
                endpoint_url,
            })
    }

    fn arb_aws_config() -> impl Strategy<Value = AwsConfig> {
        (
            prop_oneof![
                Just("us-east-1".to_string()),
                Just("eu-west-2".to_string()),
                Just("cn-north-1".to_string()),
            ],
            proptest::option::of("AKIA[A-Z0-9]{16}"),
            proptest::option::of("[a-zA-Z0-9/+]{40}"),
        )
            .prop_map(|(region, access_key_id, secret_access_key)| AwsConfig {
                region,
                access_key_id,
                secret_access_key,
                ..AwsConfig::default()
            })
    }

    fn arb_http_config() -> impl Strategy<Value = HttpConfig> {
        (
            proptest::option::of(1u64..=300u64),
            proptest::option::of(1u64..=60u64),
        )
            .prop_map(|(timeout_seconds, connect_timeout_seconds)| HttpConfig {
                timeout_seconds,
                connect_timeout_seconds,
                ..HttpConfig::default()
            })
    }

    fn arb_settings() -> impl Strategy<Value = Settings> {
        (
            arb_application_config(),
            arb_logger_settings(),
            "arn:aws:sns:us-east-1:[0-9]{12}:[a-z-]{1,20}",
            arb_metrics_config(),
            arb_aws_config(),
            arb_http_config(),
        )
            .prop_map(|(application, logger, topic_arn, metrics, aws, http)| Settings {
                application,
                logger,
                notification: NotificationConfig { topic_arn },
                metrics,
                aws,
                http,
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Serializing any settings to TOML and reading them back is lossless
        #[test]
        fn prop_settings_round_trip_serialization(settings in arb_settings()) {
            let toml_str = toml::to_string(&settings)
                .expect("Settings should serialize to TOML");

            let deserialized: Settings = toml::from_str(&toml_str)
                .expect("TOML should deserialize back to Settings");

            prop_assert_eq!(settings, deserialized);
        }
    }

    #[test]
    fn test_application_config_defaults() {
        let config = ApplicationConfig::default();
        assert_eq!(config.name, "efs-notify");
        assert_eq!(config.version, crate::pkg_version());
    }

    #[test]
    fn test_metrics_config_defaults() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
        assert_eq!(config.solution_id, "SO0031");
        assert!(config.instance_id.is_empty());
        assert_eq!(
            config.endpoint_url,
            "https://metrics.awssolutionsbuilder.com/generic"
        );
    }

    #[test]
    fn test_aws_config_defaults() {
        let config = AwsConfig::default();
        assert_eq!(config.region, "us-east-1");
        assert!(config.access_key_id.is_none());
        assert!(config.sns_endpoint.is_none());
    }

    #[test]
    fn test_aws_config_debug_redacts_secrets() {
        let config = AwsConfig {
            access_key_id: Some("AKIDEXAMPLE".to_string()),
            secret_access_key: Some("super-secret".to_string()),
            session_token: Some("token-value".to_string()),
            ..AwsConfig::default()
        };

        let debug = format!("{:?}", config);
        assert!(debug.contains("AKIDEXAMPLE"));
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("token-value"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_http_config_defaults() {
        let config = HttpConfig::default();
        assert!(config.timeout_seconds.is_none());
        assert!(config.connect_timeout_seconds.is_none());
        assert!(config.user_agent.starts_with("efs-notify/"));
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let toml_str = r#"
[notification]
topic_arn = "arn:aws:sns:eu-west-1:123456789012:backups"

[metrics]
enabled = false
"#;

        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(
            settings.notification.topic_arn,
            "arn:aws:sns:eu-west-1:123456789012:backups"
        );
        assert!(!settings.metrics.enabled);
        assert_eq!(settings.metrics.solution_id, "SO0031");
        assert_eq!(settings.aws.region, "us-east-1");
        assert_eq!(settings.logger.level, "info");
    }

    #[test]
    fn test_logger_settings_into_logger_config() {
        let settings = LoggerSettings {
            level: "debug".to_string(),
            console: ConsoleSettings {
                enabled: true,
                colored: false,
            },
            file: FileSettings {
                enabled: true,
                path: "logs/test.log".to_string(),
                append: false,
                format: "compact".to_string(),
            },
        };

        let config = settings.into_logger_config().unwrap();
        assert_eq!(config.level, "debug");
        assert!(!config.console.colored);
        assert!(config.file.enabled);
        assert_eq!(config.file.path, PathBuf::from("logs/test.log"));
        assert_eq!(config.file.format, LogFormat::Compact);
    }

    #[test]
    fn test_file_settings_into_file_config_invalid_format() {
        let settings = FileSettings {
            format: "xml".to_string(),
            ..FileSettings::default()
        };

        match settings.into_file_config() {
            Err(ConfigError::ValidationError { field, .. }) => {
                assert_eq!(field, "logger.file.format")
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_logger_settings_into_logger_config_both_disabled() {
        let settings = LoggerSettings {
            console: ConsoleSettings {
                enabled: false,
                colored: false,
            },
            ..LoggerSettings::default()
        };

        assert!(settings.into_logger_config().is_err());
    }
}
