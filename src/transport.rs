// ABOUTME: Provides the HTTP(S) transport for Clickatell API requests
// ABOUTME: Issues GET requests with reqwest and hands the raw response body back to the client

use crate::client::error::{ClickatellError, ClickatellResult};
use crate::client::traits::Transport;
use crate::client::types::ClientConfig;
use bytes::Bytes;
use tracing::debug;

/// HTTP transport backed by a `reqwest::Client`
///
/// The legacy Clickatell API is a set of GET endpoints that take all their
/// input as query parameters and answer with `text/plain` lines. This
/// transport only does the HTTP part: it builds the URL, applies the
/// configured timeout and rejects non-success statuses. Interpreting the
/// body is left to [`crate::response`].
///
/// `reqwest::Client` pools connections internally, so one transport (and the
/// client owning it) should be reused for many requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for the gateway described by `config`
    pub fn new(config: &ClientConfig) -> ClickatellResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClickatellError::from)?;

        Ok(Self::from_client(client, config.base_url()))
    }

    /// Create a transport from an existing reqwest client
    ///
    /// Useful when the application needs its own TLS or proxy settings.
    pub fn from_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    async fn get(&self, path: &str, params: &[(String, String)]) -> crate::Result<Bytes> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(ClickatellError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Box::new(ClickatellError::Transport(format!(
                "{path} returned HTTP {status}"
            ))));
        }

        let body = response.bytes().await.map_err(ClickatellError::from)?;
        debug!("{} answered {} bytes", path, body.len());

        Ok(body)
    }
}
