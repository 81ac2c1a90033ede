//! Transport seams used by the notifier.
//!
//! The notifier only knows these traits; the SNS and reqwest-backed
//! implementations live under [`crate::external`].

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// Acknowledgement returned by a topic publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResponse {
    /// Broker-assigned id of the published message
    pub message_id: String,
    /// Broker request id, when the broker reports one
    pub request_id: Option<String>,
}

impl fmt::Display for PublishResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageId={}", self.message_id)?;
        if let Some(request_id) = &self.request_id {
            write!(f, " RequestId={}", request_id)?;
        }
        Ok(())
    }
}

/// Publishes a message with a subject line to a pub/sub topic
#[async_trait]
pub trait TopicPublisher: Send + Sync {
    async fn publish(&self, topic_id: &str, subject: &str, message: &str) -> AppResult<PublishResponse>;

    /// Name used in diagnostics
    fn name(&self) -> &'static str;
}

/// Fully materialized outbound POST
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Sends a single POST and reads the whole response
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post(&self, request: HttpRequest) -> AppResult<HttpResponse>;
}
