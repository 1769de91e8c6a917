// ABOUTME: Supporting types for Clickatell client operations including credentials and configuration
// ABOUTME: Provides the request builder and template field list used by the batch commands

use crate::client::error::{ClickatellError, ClickatellResult};
use crate::client::keepalive::KeepAliveConfig;
use crate::command::Command;
use std::fmt;
use std::time::Duration;

/// Default gateway host
pub const DEFAULT_HOST: &str = "api.clickatell.com";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Clickatell HTTP API credentials
///
/// All three values are required; the client refuses to start without them.
#[derive(Clone)]
pub struct Credentials {
    /// API id of the HTTP API instance
    pub api_id: String,
    /// Account username
    pub username: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    pub fn new(
        api_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            api_id: api_id.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    fn validate(&self) -> ClickatellResult<()> {
        let required = [
            ("api_id", &self.api_id),
            ("username", &self.username),
            ("password", &self.password),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ClickatellError::Config(format!(
                    "Clickatell {name} is not configured"
                )));
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_id", &self.api_id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything the client needs to talk to the gateway
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub credentials: Credentials,
    /// `https` (default) or `http`
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// Sender id. When set, outgoing messages carry it and allow replies.
    pub from: Option<String>,
    /// Delivery callback. When set, outgoing messages request delivery
    /// acknowledgement.
    pub callback: Option<String>,
    /// Per-request timeout handed to the HTTP transport
    pub timeout: Duration,
    pub keep_alive: KeepAliveConfig,
}

impl ClientConfig {
    /// Create a configuration with default connection settings
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            scheme: "https".to_string(),
            host: DEFAULT_HOST.to_string(),
            port: 443,
            from: None,
            callback: None,
            timeout: DEFAULT_TIMEOUT,
            keep_alive: KeepAliveConfig::default(),
        }
    }

    /// Read the configuration from `CLICKATELL_*` environment variables.
    ///
    /// `CLICKATELL_API_ID`, `CLICKATELL_USERNAME` and `CLICKATELL_PASSWORD`
    /// are required; `CLICKATELL_FROM`, `CLICKATELL_CALLBACK` and
    /// `CLICKATELL_HOST` are optional.
    pub fn from_env() -> ClickatellResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClickatellResult<Self> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| ClickatellError::Config(format!("{key} is not set")))
        };

        let credentials = Credentials::new(
            required("CLICKATELL_API_ID")?,
            required("CLICKATELL_USERNAME")?,
            required("CLICKATELL_PASSWORD")?,
        );

        let mut config = ClientConfig::new(credentials);
        config.from = lookup("CLICKATELL_FROM").filter(|v| !v.is_empty());
        config.callback = lookup("CLICKATELL_CALLBACK").filter(|v| !v.is_empty());
        if let Some(host) = lookup("CLICKATELL_HOST").filter(|v| !v.is_empty()) {
            config.host = host;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration before any request is made
    pub fn validate(&self) -> ClickatellResult<()> {
        self.credentials.validate()?;

        if self.host.trim().is_empty() {
            return Err(ClickatellError::Config("host is empty".to_string()));
        }
        if !matches!(self.scheme.as_str(), "http" | "https") {
            return Err(ClickatellError::Config(format!(
                "Unsupported scheme: {}",
                self.scheme
            )));
        }

        Ok(())
    }

    /// Base URL requests are issued against, without a trailing slash
    pub fn base_url(&self) -> String {
        let default_port = match self.scheme.as_str() {
            "http" => 80,
            _ => 443,
        };

        if self.port == default_port {
            format!("{}://{}", self.scheme, self.host)
        } else {
            format!("{}://{}:{}", self.scheme, self.host, self.port)
        }
    }

    /// Optional flags shared by `sendmsg` and `startbatch`
    pub(crate) fn delivery_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(from) = self.from.as_deref().filter(|f| !f.is_empty()) {
            params.push(("mo".to_string(), "1".to_string()));
            params.push(("from".to_string(), from.to_string()));
        }

        if let Some(callback) = self.callback.as_deref().filter(|c| !c.is_empty()) {
            params.push(("callback".to_string(), callback.to_string()));
            params.push(("deliv_ack".to_string(), "1".to_string()));
        }

        params
    }
}

/// One request to the gateway.
///
/// Parameters keep their insertion order. The `session_id` is not stored here;
/// it is added in front of the parameters each time the request is sent so a
/// retry after re-authentication carries the new session.
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayRequest {
    command: Command,
    params: Vec<(String, String)>,
}

impl GatewayRequest {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            params: Vec::new(),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn command(&self) -> Command {
        self.command
    }

    /// Query parameters to send, with `session_id` first when given
    pub fn query_params(&self, session_id: Option<&str>) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.params.len() + 1);
        if let Some(session_id) = session_id {
            params.push(("session_id".to_string(), session_id.to_string()));
        }
        params.extend(self.params.iter().cloned());
        params
    }
}

impl fmt::Debug for GatewayRequest {
    // Only parameter names; values may hold credentials
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayRequest")
            .field("command", &self.command)
            .field(
                "params",
                &self.params.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Values substituted into a batch template, in order.
///
/// Clickatell names template fields `field1` to `fieldN`. Use
/// [`TemplateFields::positional`] to name them automatically, or
/// [`TemplateFields::with`] for explicit names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateFields(Vec<(String, String)>);

impl TemplateFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name values `field1`, `field2`, ... in order
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self(
            values
                .into_iter()
                .enumerate()
                .map(|(i, value)| (format!("field{}", i + 1), value.into()))
                .collect(),
        )
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((name.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for TemplateFields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Join recipients the way the batch commands expect them
pub(crate) fn join_recipients<S: AsRef<str>>(recipients: &[S]) -> ClickatellResult<String> {
    if recipients.is_empty() {
        return Err(ClickatellError::InvalidData(
            "At least one recipient is required".to_string(),
        ));
    }

    Ok(recipients
        .iter()
        .map(|r| r.as_ref().trim())
        .collect::<Vec<_>>()
        .join(","))
}
