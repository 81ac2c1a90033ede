//! Best-effort customer notifications and anonymous metrics.

use std::sync::Arc;

use serde::Serialize;

use super::encoding::to_pretty_json;
use super::metrics::MetricsEnvelope;
use super::transport::{HttpResponse, HttpTransport, PublishResponse, TopicPublisher};
use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::external::client::{ReqwestTransport, build_http_client};
use crate::external::sns::SnsPublisher;
use crate::logger::LogSink;

/// Subject line of every customer status notification
pub const BACKUP_STATUS_SUBJECT: &str = "EFS Backup Status";

/// Sends customer status notifications and anonymous usage metrics
///
/// Neither operation ever fails from the caller's point of view: every error
/// is written to the injected [`LogSink`] once, at error level, and the call
/// yields `None`. Callers that need to tell failure kinds apart must read the
/// logs.
///
/// # Example
/// ```ignore
/// let notifier = Notifier::from_settings(Arc::new(TracingSink::default()), &settings)?;
/// let status = Payload::mapping().with("status", "OK");
/// notifier.notify_customer(&settings.notification.topic_arn, &status).await;
/// ```
#[derive(Clone)]
pub struct Notifier {
    logger: Arc<dyn LogSink>,
    publisher: Arc<dyn TopicPublisher>,
    transport: Arc<dyn HttpTransport>,
}

impl Notifier {
    pub fn new(
        logger: Arc<dyn LogSink>,
        publisher: Arc<dyn TopicPublisher>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            logger,
            publisher,
            transport,
        }
    }

    /// Wires the SNS publisher and the reqwest transport from settings,
    /// sharing one HTTP client between them
    ///
    /// # Errors
    /// Fails when the HTTP client cannot be built or the SNS endpoint
    /// override is not a URL. Missing AWS credentials only surface when a
    /// status is published.
    pub fn from_settings(logger: Arc<dyn LogSink>, settings: &Settings) -> AppResult<Self> {
        let client = build_http_client(&settings.http)?;
        let publisher = SnsPublisher::from_config(client.clone(), &settings.aws)?;
        let transport = ReqwestTransport::new(client);

        Ok(Self::new(logger, Arc::new(publisher), Arc::new(transport)))
    }

    /// Publishes `message` as pretty, key-sorted JSON to `topic_id` under
    /// [`BACKUP_STATUS_SUBJECT`]
    ///
    /// Returns the broker acknowledgement, or `None` after logging the failure.
    pub async fn notify_customer<T>(&self, topic_id: &str, message: &T) -> Option<PublishResponse>
    where
        T: Serialize + ?Sized,
    {
        match self.publish_status(topic_id, message).await {
            Ok(response) => {
                self.logger.info(&format!(
                    "{} publish response: {}",
                    self.publisher.name(),
                    response
                ));
                Some(response)
            }
            Err(err) => {
                self.report_failure("notify_customer", err);
                None
            }
        }
    }

    /// Posts the metrics envelope for `data` to `endpoint_url`
    ///
    /// Returns the HTTP status code exactly as the transport reported it, or
    /// `None` after logging the failure. No retry is attempted.
    pub async fn send_metrics<T>(
        &self,
        solution_id: &str,
        instance_id: &str,
        data: &T,
        endpoint_url: &str,
    ) -> Option<u16>
    where
        T: Serialize + ?Sized,
    {
        match self
            .post_metrics(solution_id, instance_id, data, endpoint_url)
            .await
        {
            Ok(response) => {
                self.logger
                    .info(&format!("Response Code: {}", response.status));
                self.logger.debug(&format!(
                    "Response Body: {}",
                    String::from_utf8_lossy(&response.body)
                ));
                Some(response.status)
            }
            Err(err) => {
                self.report_failure("send_metrics", err);
                None
            }
        }
    }

    async fn publish_status<T>(&self, topic_id: &str, message: &T) -> AppResult<PublishResponse>
    where
        T: Serialize + ?Sized,
    {
        let body = to_pretty_json(message)?;
        self.publisher
            .publish(topic_id, BACKUP_STATUS_SUBJECT, &body)
            .await
    }

    async fn post_metrics<T>(
        &self,
        solution_id: &str,
        instance_id: &str,
        data: &T,
        endpoint_url: &str,
    ) -> AppResult<HttpResponse>
    where
        T: Serialize + ?Sized,
    {
        let request = MetricsEnvelope::new(solution_id, instance_id, data)?.to_request(endpoint_url)?;
        self.transport.post(request).await
    }

    fn report_failure(&self, operation: &str, err: AppError) {
        let err = anyhow::Error::from(err);
        self.logger
            .error(&format!("unhandled error in {}: {:#}", operation, err), true);
    }
}
