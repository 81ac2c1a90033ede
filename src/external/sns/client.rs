use async_trait::async_trait;
use jiff::Timestamp;
use url::Url;

use super::sigv4::{self, SignableRequest, SigningScope};
use super::types::{
    Credentials, TopicArn, dns_suffix, missing_credentials, parse_error_response,
    parse_publish_response,
};
use crate::config::AwsConfig;
use crate::error::{AppError, AppResult};
use crate::notify::{HttpRequest, PublishResponse, TopicPublisher};

const SERVICE: &str = "sns";
const API_VERSION: &str = "2010-03-31";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Publishes to Amazon SNS topics through the Query API
///
/// Without credentials every publish fails with a configuration error.
pub struct SnsPublisher {
    client: reqwest::Client,
    credentials: Option<Credentials>,
    region: String,
    endpoint: Option<Url>,
}

impl SnsPublisher {
    pub fn new(
        client: reqwest::Client,
        credentials: Option<Credentials>,
        region: impl Into<String>,
        endpoint: Option<Url>,
    ) -> Self {
        Self {
            client,
            credentials,
            region: region.into(),
            endpoint,
        }
    }

    /// Resolves credentials and the optional endpoint override from `config`
    ///
    /// Missing credentials do not fail construction, so a process that only
    /// sends metrics needs no AWS access.
    pub fn from_config(client: reqwest::Client, config: &AwsConfig) -> AppResult<Self> {
        let credentials = match Credentials::resolve(config) {
            Ok(credentials) => Some(credentials),
            Err(e) => {
                tracing::debug!(error = %e, "SNS publisher has no credentials");
                None
            }
        };
        let endpoint = config
            .sns_endpoint
            .as_deref()
            .map(|raw| {
                Url::parse(raw).map_err(|e| AppError::Configuration {
                    key: "aws.sns_endpoint".to_string(),
                    source: e.into(),
                })
            })
            .transpose()?;

        Ok(Self::new(client, credentials, config.region.clone(), endpoint))
    }

    /// Region used to sign, and the URL to call, for `topic_id`
    ///
    /// A topic ARN selects its own region and partition. Anything else goes to
    /// the configured region and is left for the service to reject.
    fn route(&self, topic_id: &str) -> AppResult<(String, Url)> {
        let (region, suffix) = match topic_id.parse::<TopicArn>() {
            Ok(arn) => {
                let suffix = arn.dns_suffix();
                (arn.region, suffix)
            }
            Err(_) => (self.region.clone(), dns_suffix("aws")),
        };

        let url = match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => {
                let raw = format!("https://{}.{}.{}/", SERVICE, region, suffix);
                Url::parse(&raw).map_err(|e| AppError::Validation {
                    field: "topic_arn".to_string(),
                    reason: format!("cannot derive an endpoint from '{}': {}", raw, e),
                })?
            }
        };

        Ok((region, url))
    }

    /// Builds the signed `Publish` call
    fn build_request(
        &self,
        topic_id: &str,
        subject: &str,
        message: &str,
        time: Timestamp,
    ) -> AppResult<HttpRequest> {
        let credentials = self.credentials.as_ref().ok_or_else(missing_credentials)?;
        let (region, url) = self.route(topic_id)?;

        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(AppError::Validation {
                    field: "aws.sns_endpoint".to_string(),
                    reason: format!("'{}' has no host", url),
                });
            }
        };

        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("Action", "Publish")
            .append_pair("Version", API_VERSION)
            .append_pair("TopicArn", topic_id)
            .append_pair("Subject", subject)
            .append_pair("Message", message)
            .finish()
            .into_bytes();

        let mut headers = vec![
            ("content-type".to_string(), FORM_CONTENT_TYPE.to_string()),
            ("host".to_string(), host),
        ];
        let signed = sigv4::sign(
            &SignableRequest {
                method: "POST",
                path: url.path(),
                query: "",
                headers: headers.clone(),
                payload: &body,
            },
            &SigningScope {
                region: &region,
                service: SERVICE,
                time,
            },
            credentials,
        );
        headers.extend(signed);

        Ok(HttpRequest {
            url: url.to_string(),
            headers,
            body,
        })
    }
}

#[async_trait]
impl TopicPublisher for SnsPublisher {
    async fn publish(&self, topic_id: &str, subject: &str, message: &str) -> AppResult<PublishResponse> {
        let request = self.build_request(topic_id, subject, message, Timestamp::now())?;
        tracing::debug!(topic = %topic_id, url = %request.url, "Publishing to SNS");

        let mut builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let resp = builder
            .body(request.body)
            .send()
            .await
            .map_err(|e| AppError::transport(format!("SNS Publish to {}", topic_id), e))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| AppError::transport(format!("SNS Publish to {}", topic_id), e))?;

        if !status.is_success() {
            return Err(parse_error_response(status.as_u16(), &text));
        }

        parse_publish_response(&text)
    }

    fn name(&self) -> &'static str {
        "sns"
    }
}
