//! Check command handler
//!
//! Validates configuration and prints a summary without contacting any service.

use crate::config::settings::Settings;
use crate::error::AppResult;
use crate::external::sns::{Credentials, TopicArn};

/// Handler for the check command
pub struct CheckCommandHandler {
    config: Settings,
}

impl CheckCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Validate configuration and print what a send would use
    ///
    /// Returns the summary lines that were printed.
    ///
    /// # Errors
    /// - Configuration validation errors
    /// - A configured topic that is not an SNS topic ARN
    pub fn execute(&self) -> AppResult<Vec<String>> {
        self.config.validate()?;

        let mut summary = vec![format!(
            "✓ Configuration is valid ({} {})",
            self.config.application.name, self.config.application.version
        )];
        summary.extend(self.notification_summary()?);
        summary.push(self.metrics_summary());
        summary.push(format!("✓ Log level: {}", self.config.logger.level));

        for line in &summary {
            println!("{}", line);
        }
        Ok(summary)
    }

    fn notification_summary(&self) -> AppResult<Vec<String>> {
        let topic = &self.config.notification.topic_arn;
        let mut lines = Vec::new();

        if topic.is_empty() {
            lines.push("- No default topic; customer needs --topic".to_string());
        } else {
            let arn: TopicArn = topic.parse()?;
            lines.push(format!("✓ Default topic: {} (region {})", arn, arn.region));
        }

        match Credentials::resolve(&self.config.aws) {
            Ok(credentials) => lines.push(format!(
                "✓ AWS credentials found for access key {}",
                credentials.access_key_id
            )),
            Err(e) => lines.push(format!("- AWS credentials unavailable: {:#}", anyhow::Error::from(e))),
        }

        Ok(lines)
    }

    fn metrics_summary(&self) -> String {
        let metrics = &self.config.metrics;
        if metrics.enabled {
            format!(
                "✓ Metrics enabled: solution {} -> {}",
                metrics.solution_id, metrics.endpoint_url
            )
        } else {
            "- Metrics disabled".to_string()
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}
