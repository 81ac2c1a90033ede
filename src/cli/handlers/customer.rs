//! Customer command handler
//!
//! Publishes a backup status message to the configured or given topic.

use std::path::Path;

use serde_json::Value;

use crate::config::settings::Settings;
use crate::error::{AppError, AppResult};
use crate::notify::{Notifier, PublishResponse};

/// Handler for the customer command
pub struct CustomerCommandHandler {
    config: Settings,
    notifier: Notifier,
}

impl CustomerCommandHandler {
    pub fn new(config: Settings, notifier: Notifier) -> Self {
        Self { config, notifier }
    }

    /// Publish the message taken from `message` or read from `message_file`
    ///
    /// # Errors
    /// - No topic configured or given
    /// - The message file cannot be read or is not JSON
    /// - The notifier reported no acknowledgement
    pub async fn execute(
        &self,
        message: Option<&Value>,
        message_file: Option<&Path>,
    ) -> AppResult<PublishResponse> {
        let topic = self.topic()?;
        let message = Self::resolve_message(message, message_file)?;

        let response = self
            .notifier
            .notify_customer(topic, &message)
            .await
            .ok_or_else(|| AppError::Internal {
                source: anyhow::anyhow!("status notification to {} was not delivered", topic),
            })?;

        println!("✓ Published status to {} ({})", topic, response);
        Ok(response)
    }

    fn topic(&self) -> AppResult<&str> {
        let topic = self.config.notification.topic_arn.as_str();
        if topic.is_empty() {
            return Err(AppError::Validation {
                field: "notification.topic_arn".to_string(),
                reason: "no topic configured; pass --topic or set notification.topic_arn"
                    .to_string(),
            });
        }
        Ok(topic)
    }

    fn resolve_message(message: Option<&Value>, message_file: Option<&Path>) -> AppResult<Value> {
        match (message, message_file) {
            (Some(message), _) => Ok(message.clone()),
            (None, Some(path)) => {
                let raw = std::fs::read_to_string(path).map_err(|e| AppError::Validation {
                    field: "message_file".to_string(),
                    reason: format!("cannot read '{}': {}", path.display(), e),
                })?;
                Ok(serde_json::from_str(&raw)?)
            }
            (None, None) => Err(AppError::Validation {
                field: "message".to_string(),
                reason: "either --message or --message-file is required".to_string(),
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}
