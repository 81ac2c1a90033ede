//! Customer status notifications and anonymous usage metrics.
//!
//! [`Notifier`] is the entry point. Payloads are rendered by the
//! [`encoding`] module and handed to a [`TopicPublisher`] or an
//! [`HttpTransport`].

pub mod encoding;
mod metrics;
mod notifier;
mod payload;
mod transport;

#[cfg(test)]
mod tests;

pub use metrics::{METRICS_CONTENT_TYPE, MetricsEnvelope};
pub use notifier::{BACKUP_STATUS_SUBJECT, Notifier};
pub use payload::{Payload, serialize_decimal};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, PublishResponse, TopicPublisher};
