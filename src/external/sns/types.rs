use std::fmt;
use std::str::FromStr;

use crate::config::AwsConfig;
use crate::error::{AppError, AppResult};
use crate::notify::PublishResponse;

/// Parsed `arn:{partition}:sns:{region}:{account}:{name}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicArn {
    pub partition: String,
    pub region: String,
    pub account: String,
    pub name: String,
}

impl TopicArn {
    /// DNS suffix of the partition's service endpoints
    pub fn dns_suffix(&self) -> &'static str {
        dns_suffix(&self.partition)
    }
}

pub(crate) fn dns_suffix(partition: &str) -> &'static str {
    match partition {
        "aws-cn" => "amazonaws.com.cn",
        _ => "amazonaws.com",
    }
}

impl FromStr for TopicArn {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| AppError::Validation {
            field: "topic_arn".to_string(),
            reason: format!("'{}' {}", s, reason),
        };

        let parts: Vec<&str> = s.splitn(6, ':').collect();
        if parts.len() != 6 || parts[0] != "arn" {
            return Err(invalid("is not an ARN"));
        }
        if parts[2] != "sns" {
            return Err(invalid("is not an SNS ARN"));
        }
        if parts[1].is_empty() || parts[3].is_empty() || parts[4].is_empty() || parts[5].is_empty() {
            return Err(invalid("has an empty component"));
        }

        Ok(Self {
            partition: parts[1].to_string(),
            region: parts[3].to_string(),
            account: parts[4].to_string(),
            name: parts[5].to_string(),
        })
    }
}

impl fmt::Display for TopicArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:sns:{}:{}:{}",
            self.partition, self.region, self.account, self.name
        )
    }
}

/// AWS access credentials used for request signing
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl Credentials {
    /// Credentials from settings, falling back to the standard `AWS_*`
    /// environment variables
    pub fn resolve(config: &AwsConfig) -> AppResult<Self> {
        Self::resolve_with(config, |name| std::env::var(name).ok())
    }

    pub(crate) fn resolve_with<F>(config: &AwsConfig, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let (Some(access_key_id), Some(secret_access_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            return Ok(Self {
                access_key_id: access_key_id.clone(),
                secret_access_key: secret_access_key.clone(),
                session_token: config.session_token.clone(),
            });
        }

        let non_empty = |name: &str| lookup(name).filter(|value| !value.is_empty());
        match (non_empty("AWS_ACCESS_KEY_ID"), non_empty("AWS_SECRET_ACCESS_KEY")) {
            (Some(access_key_id), Some(secret_access_key)) => Ok(Self {
                access_key_id,
                secret_access_key,
                session_token: non_empty("AWS_SESSION_TOKEN"),
            }),
            _ => Err(missing_credentials()),
        }
    }
}

pub(crate) fn missing_credentials() -> AppError {
    AppError::Configuration {
        key: "aws.access_key_id".to_string(),
        source: anyhow::anyhow!(
            "no AWS credentials in settings or AWS_ACCESS_KEY_ID/AWS_SECRET_ACCESS_KEY"
        ),
    }
}

/// Text content of the first `<tag>...</tag>` element in `xml`
pub(crate) fn extract_tag<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = xml.find(&open)? + open.len();
    let end = xml[start..].find(&close)? + start;
    Some(xml[start..end].trim())
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Reads `PublishResponse` XML from a 2xx answer
pub(crate) fn parse_publish_response(body: &str) -> AppResult<PublishResponse> {
    let message_id = extract_tag(body, "MessageId").ok_or_else(|| AppError::Internal {
        source: anyhow::anyhow!("SNS response carries no MessageId: {}", body),
    })?;

    Ok(PublishResponse {
        message_id: unescape_xml(message_id),
        request_id: extract_tag(body, "RequestId").map(unescape_xml),
    })
}

/// Turns a non-2xx answer into [`AppError::Rejected`]
pub(crate) fn parse_error_response(status: u16, body: &str) -> AppError {
    let code = extract_tag(body, "Code")
        .map(unescape_xml)
        .unwrap_or_else(|| "Unknown".to_string());
    let message = extract_tag(body, "Message")
        .map(unescape_xml)
        .unwrap_or_else(|| body.trim().to_string());

    AppError::Rejected {
        status,
        code,
        message,
    }
}
