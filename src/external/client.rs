use std::time::Duration;

use async_trait::async_trait;

use crate::config::HttpConfig;
use crate::error::{AppError, AppResult};
use crate::notify::{HttpRequest, HttpResponse, HttpTransport};

/// Build the HTTP client shared by the SNS publisher and the metrics transport
///
/// One client is created per process so both transports reuse the same
/// connection pool.
///
/// # Features
/// - **Timeouts**: only applied when configured; otherwise reqwest's defaults hold
/// - **HTTP/2**: negotiated through ALPN when the server offers it
/// - **Security**: Uses Rustls for TLS (no OpenSSL dependency)
///
/// # Example
/// ```rust,ignore
/// use efs_notify::config::HttpConfig;
/// use efs_notify::external::client::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default())?;
/// ```
pub fn build_http_client(config: &HttpConfig) -> AppResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        // Connection pooling
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .user_agent(config.user_agent.as_str());

    if let Some(timeout) = config.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(timeout));
    }
    if let Some(timeout) = config.connect_timeout_seconds {
        builder = builder.connect_timeout(Duration::from_secs(timeout));
    }

    builder.build().map_err(|e| AppError::Configuration {
        key: "http".to_string(),
        source: e.into(),
    })
}

/// [`HttpTransport`] backed by a [`reqwest::Client`]
///
/// Headers and body are sent verbatim. A status of 400 or above is reported
/// as [`AppError::Rejected`]; anything below is handed back unchanged.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(&self, request: HttpRequest) -> AppResult<HttpResponse> {
        let mut builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let resp = builder.body(request.body).send().await?;
        let status = resp.status();
        let body = resp.bytes().await?.to_vec();

        tracing::debug!(url = %request.url, status = status.as_u16(), "POST completed");

        if status.is_client_error() || status.is_server_error() {
            return Err(AppError::Rejected {
                status: status.as_u16(),
                code: status
                    .canonical_reason()
                    .unwrap_or("HTTP error")
                    .to_string(),
                message: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(HttpResponse {
            status: status.as_u16(),
            body,
        })
    }
}
