//! Anonymous usage metrics envelope.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::encoding::to_pretty_json;
use super::transport::HttpRequest;
use crate::error::AppResult;

/// Content type sent with every metrics POST
pub const METRICS_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Body of a metrics POST
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsEnvelope {
    /// ISO-8601 UTC capture time
    #[serde(rename = "TimeStamp")]
    pub timestamp: String,
    #[serde(rename = "Solution")]
    pub solution: String,
    #[serde(rename = "UUID")]
    pub uuid: String,
    #[serde(rename = "Data")]
    pub data: Value,
}

impl MetricsEnvelope {
    /// Builds an envelope stamped with the current time
    pub fn new<T: Serialize + ?Sized>(solution_id: &str, instance_id: &str, data: &T) -> AppResult<Self> {
        Self::at(Timestamp::now(), solution_id, instance_id, data)
    }

    pub fn at<T: Serialize + ?Sized>(
        timestamp: Timestamp,
        solution_id: &str,
        instance_id: &str,
        data: &T,
    ) -> AppResult<Self> {
        Ok(Self {
            timestamp: timestamp.to_string(),
            solution: solution_id.to_string(),
            uuid: instance_id.to_string(),
            data: serde_json::to_value(data)?,
        })
    }

    /// Encodes the envelope as a POST to `endpoint_url`
    pub fn to_request(&self, endpoint_url: &str) -> AppResult<HttpRequest> {
        let body = to_pretty_json(self)?.into_bytes();
        Ok(HttpRequest {
            url: endpoint_url.to_string(),
            headers: vec![
                ("content-type".to_string(), METRICS_CONTENT_TYPE.to_string()),
                ("content-length".to_string(), body.len().to_string()),
            ],
            body,
        })
    }
}
