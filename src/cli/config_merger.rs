//! Configuration merger for CLI arguments and config files
//!
//! This module handles merging CLI argument overrides with file-based configuration,
//! implementing the configuration precedence logic.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, settings::Settings};

/// Applies CLI overrides on top of file-based configuration
///
/// CLI arguments have the highest priority, above environment variables and
/// configuration files.
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    /// Create a new configuration merger with base configuration
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load the base configuration selected by `--config` and `--env`
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading or validation fails
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;

        if let Some(path) = &cli.config {
            loader = loader.with_config_file(path);
        }
        if let Some(env) = cli.env {
            loader = loader.with_environment(env.into());
        }

        Ok(Self::new(loader.load()?))
    }

    /// Merge CLI arguments with the base configuration
    ///
    /// Returns a new, validated Settings instance with CLI overrides applied.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        self.apply_global_overrides(&mut config, cli);
        self.apply_command_overrides(&mut config, &cli.command);

        config.validate()?;

        Ok(config)
    }

    fn apply_global_overrides(&self, config: &mut Settings, cli: &Cli) {
        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }
    }

    fn apply_command_overrides(&self, config: &mut Settings, command: &Commands) {
        match command {
            Commands::Customer { topic, .. } => {
                if let Some(topic_arn) = topic {
                    config.notification.topic_arn = topic_arn.clone();
                }
            }
            Commands::Metrics {
                solution_id,
                instance_id,
                url,
                ..
            } => {
                if let Some(id) = solution_id {
                    config.metrics.solution_id = id.clone();
                }
                if let Some(id) = instance_id {
                    config.metrics.instance_id = id.clone();
                }
                if let Some(endpoint) = url {
                    config.metrics.endpoint_url = endpoint.clone();
                }
            }
            Commands::Check => {}
        }
    }

    /// Get the base configuration (useful for inspection)
    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}
