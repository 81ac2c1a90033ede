//! Metrics command handler

use serde_json::Value;
use uuid::Uuid;

use crate::config::settings::Settings;
use crate::error::{AppError, AppResult};
use crate::notify::Notifier;

/// Handler for the metrics command
pub struct MetricsCommandHandler {
    config: Settings,
    notifier: Notifier,
}

impl MetricsCommandHandler {
    pub fn new(config: Settings, notifier: Notifier) -> Self {
        Self { config, notifier }
    }

    /// Send `data` to the metrics collector
    ///
    /// Returns `Ok(None)` without sending anything when metrics are disabled,
    /// otherwise the status code the collector answered with.
    pub async fn execute(&self, data: &Value) -> AppResult<Option<u16>> {
        let metrics = &self.config.metrics;
        if !metrics.enabled {
            tracing::info!("Anonymous metrics are disabled, nothing sent");
            return Ok(None);
        }

        let instance_id = self.instance_id();
        let status = self
            .notifier
            .send_metrics(&metrics.solution_id, &instance_id, data, &metrics.endpoint_url)
            .await
            .ok_or_else(|| AppError::Internal {
                source: anyhow::anyhow!("metrics for {} were not delivered", metrics.endpoint_url),
            })?;

        println!("✓ Metrics sent to {} (status {})", metrics.endpoint_url, status);
        Ok(Some(status))
    }

    /// Configured instance id, or a fresh random one when none is set
    fn instance_id(&self) -> String {
        let configured = self.config.metrics.instance_id.trim();
        if configured.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            configured.to_string()
        }
    }
}
