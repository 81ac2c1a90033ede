//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;

/// Publish EFS backup status notifications and anonymous usage metrics
#[derive(Parser, Debug)]
#[command(name = "efs-notify")]
#[command(about = "Publish EFS backup status notifications and anonymous usage metrics")]
#[command(long_about = "
efs-notify publishes a JSON status message to an Amazon SNS topic under the
subject \"EFS Backup Status\" and posts anonymous usage metrics to an HTTP
collector. Delivery is best effort: failures are logged, never retried.

EXAMPLES:
    # Publish a status to the configured topic
    efs-notify customer --message '{\"status\": \"OK\"}'

    # Publish to an explicit topic from a file
    efs-notify customer --topic arn:aws:sns:us-east-1:123456789012:backups \\
        --message-file status.json

    # Send anonymous metrics
    efs-notify metrics --data '{\"Size\": 42}'

    # Validate configuration without sending anything
    efs-notify --env production check
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// Load exactly this TOML file instead of the layered configuration
    /// directory. The file must exist and be readable.
    ///
    /// Example: --config /etc/efs-notify/production.toml
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `{environment}.toml` layer is loaded, taking precedence
    /// over EFS_NOTIFY_APP_ENV.
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    ///
    /// Raises the log level to debug, which includes response bodies.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish a backup status message to an SNS topic
    ///
    /// The message is re-serialized as pretty, key-sorted JSON before it is
    /// published under the subject "EFS Backup Status".
    ///
    /// Examples:
    ///   efs-notify customer --message '{"status": "OK"}'
    ///   efs-notify customer --topic arn:aws:sns:eu-west-1:123456789012:t --message-file s.json
    Customer {
        /// Topic ARN, defaults to notification.topic_arn
        #[arg(short, long, value_name = "ARN", value_parser = super::validation::validate_topic)]
        topic: Option<String>,

        /// Status message as inline JSON
        #[arg(
            short,
            long,
            value_name = "JSON",
            value_parser = super::validation::validate_json,
            conflicts_with = "message_file",
            required_unless_present = "message_file"
        )]
        message: Option<Value>,

        /// Read the status message from a JSON file
        #[arg(long, value_name = "PATH")]
        message_file: Option<PathBuf>,
    },
    /// Post anonymous usage metrics
    ///
    /// Does nothing when metrics.enabled is false.
    ///
    /// Examples:
    ///   efs-notify metrics --data '{"Size": 42}'
    ///   efs-notify metrics --data '{}' --instance-id 5c6e... --url https://collector/m
    Metrics {
        /// Metrics payload as inline JSON
        #[arg(short, long, value_name = "JSON", value_parser = super::validation::validate_json)]
        data: Value,

        /// Solution id, defaults to metrics.solution_id
        #[arg(long, value_name = "ID")]
        solution_id: Option<String>,

        /// Instance id, defaults to metrics.instance_id or a random UUID
        #[arg(long, value_name = "ID")]
        instance_id: Option<String>,

        /// Collector URL, defaults to metrics.endpoint_url
        #[arg(long, value_name = "URL", value_parser = super::validation::validate_url)]
        url: Option<String>,
    },
    /// Validate configuration and print a summary without sending anything
    Check,
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}
