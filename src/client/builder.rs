// ABOUTME: Client factory and builder patterns for easy Clickatell client creation
// ABOUTME: Collects credentials and optional settings, validating them before any request

use crate::client::default::ClickatellClient;
use crate::client::error::ClickatellResult;
use crate::client::keepalive::KeepAliveConfig;
use crate::client::traits::Transport;
use crate::client::types::{ClientConfig, Credentials};
use crate::transport::HttpTransport;
use std::time::Duration;

/// Builder for Clickatell clients
///
/// Starts from the default gateway settings (`https://api.clickatell.com`,
/// 30 second timeout, 10 minute keep-alive) and lets the caller override
/// them. Nothing touches the network until the first operation.
///
/// ```rust,no_run
/// use clickatell::client::{ClientBuilder, Credentials};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ClientBuilder::new(Credentials::new("3412345", "user", "secret"))
///     .from("27820000000")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            config: ClientConfig::new(credentials),
        }
    }

    /// Start from an existing configuration
    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Start from `CLICKATELL_*` environment variables
    pub fn from_env() -> ClickatellResult<Self> {
        Ok(Self::with_config(ClientConfig::from_env()?))
    }

    /// Sender id; also enables replies (`mo=1`)
    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.config.from = Some(from.into());
        self
    }

    /// Delivery callback; also requests delivery acknowledgement
    pub fn callback(mut self, callback: impl Into<String>) -> Self {
        self.config.callback = Some(callback.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.config.scheme = scheme.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn keep_alive(mut self, keep_alive: KeepAliveConfig) -> Self {
        self.config.keep_alive = keep_alive;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a client using the HTTP transport
    pub fn build(self) -> ClickatellResult<ClickatellClient<HttpTransport>> {
        ClickatellClient::new(self.config)
    }

    /// Build a client over a custom transport
    pub fn build_with_transport<T: Transport>(
        self,
        transport: T,
    ) -> ClickatellResult<ClickatellClient<T>> {
        ClickatellClient::with_transport(self.config, transport)
    }
}

/// Convenience functions for quick client creation
impl ClientBuilder {
    /// Client with default settings for the given credentials
    pub fn quick(
        api_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> ClickatellResult<ClickatellClient<HttpTransport>> {
        Self::new(Credentials::new(api_id, username, password)).build()
    }
}
