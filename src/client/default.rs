// ABOUTME: Default Clickatell client implementation providing complete trait implementations
// ABOUTME: Owns the session token and applies the single re-authentication retry on session errors

use crate::client::error::{ClickatellError, ClickatellResult, ErrorCodeDisplay};
use crate::client::keepalive::{KeepAliveManager, KeepAliveStatus};
use crate::client::traits::{BatchSender, GatewaySession, MessageSender, Transport};
use crate::client::types::{ClientConfig, GatewayRequest, TemplateFields, join_recipients};
use crate::command::Command;
use crate::response::{self, Reply, StatusReport};
use crate::transport::HttpTransport;
use tracing::{debug, info, warn};

/// Progress of one logical call through the retry policy
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Attempt {
    Fresh,
    Retried,
}

/// Default Clickatell client implementation
///
/// Implements every gateway trait on top of a [`Transport`]. The session id
/// obtained from `auth` is cached and reused until the gateway reports it
/// unusable (codes `001`, `003`, `005`); the failing request is then retried
/// exactly once with a fresh session.
///
/// All operations take `&mut self`, so a client shared between tasks must be
/// wrapped in a lock (see [`SharedClient`](crate::client::SharedClient)).
pub struct ClickatellClient<T: Transport = HttpTransport> {
    config: ClientConfig,
    transport: T,
    /// Cached session id
    session_id: Option<String>,
    keep_alive: KeepAliveManager,
}

impl ClickatellClient<HttpTransport> {
    /// Create a client that talks to the configured gateway over HTTP(S)
    ///
    /// Fails with [`ClickatellError::Config`] before any request if a
    /// credential is missing.
    pub fn new(config: ClientConfig) -> ClickatellResult<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> ClickatellClient<T> {
    /// Create a client over a custom transport
    pub fn with_transport(config: ClientConfig, transport: T) -> ClickatellResult<Self> {
        config.validate()?;

        Ok(ClickatellClient {
            keep_alive: KeepAliveManager::new(config.keep_alive.clone()),
            config,
            transport,
            session_id: None,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Configured API id
    pub fn api_id(&self) -> &str {
        &self.config.credentials.api_id
    }

    /// Configured sender id, if any
    pub fn from(&self) -> Option<&str> {
        self.config.from.as_deref()
    }

    /// Currently cached session id, if any
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn keep_alive_status(&self) -> KeepAliveStatus {
        self.keep_alive.status()
    }

    /// True once keep-alive pings have failed `max_failures` times in a row
    pub fn is_keep_alive_failed(&self) -> bool {
        self.keep_alive.is_session_failed()
    }

    /// Ping the gateway if the session has been idle for the keep-alive
    /// interval. Returns whether a ping was sent.
    pub async fn maintain_keep_alive(&mut self) -> ClickatellResult<bool> {
        if self.session_id.is_none() || !self.keep_alive.should_ping() {
            return Ok(false);
        }

        self.keep_alive.on_ping_sent();
        match self.ping().await {
            Ok(true) => {
                self.keep_alive.on_ping_success();
                Ok(true)
            }
            Ok(false) => {
                self.keep_alive.on_ping_failure();
                Ok(true)
            }
            Err(e) => {
                self.keep_alive.on_ping_failure();
                Err(e)
            }
        }
    }

    /// One round trip: send the request and interpret the body
    async fn round_trip(
        &self,
        request: &GatewayRequest,
        session_id: Option<&str>,
    ) -> ClickatellResult<Reply> {
        let command = request.command();
        let params = request.query_params(session_id);

        debug!("-> {} ({} params)", command, params.len());
        let body = self.transport.get(command.path(), &params).await?;

        let reply = response::decode(&body);
        match &reply {
            Ok(reply) => debug!("<- {} ok ({} ids)", command, reply.len()),
            Err(e) => debug!("<- {} failed: {}", command, ErrorCodeDisplay(e)),
        }
        reply
    }

    /// Issue a session command, re-authenticating and retrying once if the
    /// gateway reports the session unusable.
    async fn execute(&mut self, request: GatewayRequest) -> ClickatellResult<Reply> {
        let mut attempt = Attempt::Fresh;

        loop {
            let session_id = self.authenticate(false).await?;

            match self.round_trip(&request, Some(&session_id)).await {
                Ok(reply) => {
                    self.keep_alive.record_activity();
                    return Ok(reply);
                }
                Err(e) if attempt == Attempt::Fresh && e.is_session_error() => {
                    warn!(
                        "{} rejected with {}, re-authenticating",
                        request.command(),
                        ErrorCodeDisplay(&e)
                    );
                    self.authenticate(true).await?;
                    attempt = Attempt::Retried;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Options shared by `sendmsg` and `startbatch`
    fn with_delivery_params(&self, request: GatewayRequest) -> GatewayRequest {
        request.params(self.config.delivery_params())
    }
}

impl<T: Transport> GatewaySession for ClickatellClient<T> {
    async fn authenticate(&mut self, force: bool) -> ClickatellResult<String> {
        if force {
            self.invalidate_session();
        }

        if let Some(session_id) = self.session_id.as_ref().filter(|s| !s.is_empty()) {
            return Ok(session_id.clone());
        }

        let credentials = &self.config.credentials;
        let request = GatewayRequest::new(Command::Auth)
            .param("api_id", &credentials.api_id)
            .param("user", &credentials.username)
            .param("password", &credentials.password);

        let session_id = self.round_trip(&request, None).await?.into_single_id()?;
        if session_id.is_empty() {
            return Err(ClickatellError::InvalidData(
                "Gateway returned an empty session id".to_string(),
            ));
        }

        info!("Authenticated with gateway (api_id {})", self.api_id());
        self.session_id = Some(session_id.clone());
        self.keep_alive.record_activity();
        Ok(session_id)
    }

    async fn ping(&mut self) -> ClickatellResult<bool> {
        match self.execute(GatewayRequest::new(Command::Ping)).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_gateway_reported() => {
                warn!("Ping failed: {}", e);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    fn invalidate_session(&mut self) {
        if self.session_id.take().is_some() {
            debug!("Session invalidated");
        }
        self.keep_alive.reset();
    }
}

impl<T: Transport> MessageSender for ClickatellClient<T> {
    async fn send(&mut self, to: &str, text: &str) -> ClickatellResult<String> {
        let request = GatewayRequest::new(Command::SendMsg)
            .param("to", to)
            .param("text", text);
        let request = self.with_delivery_params(request);

        self.execute(request).await?.into_single_id()
    }

    async fn query(&mut self, message_id: &str) -> ClickatellResult<StatusReport> {
        let request = GatewayRequest::new(Command::QueryMsg).param("apimsgid", message_id);

        let text = self.execute(request).await?.into_single_id()?;
        Ok(StatusReport::parse(&text))
    }
}

impl<T: Transport> BatchSender for ClickatellClient<T> {
    async fn start_batch(&mut self, template: &str) -> ClickatellResult<String> {
        let request = GatewayRequest::new(Command::StartBatch).param("template", template);
        let request = self.with_delivery_params(request);

        self.execute(request).await?.into_single_id()
    }

    async fn send_item<S: AsRef<str>>(
        &mut self,
        batch_id: &str,
        recipients: &[S],
        fields: &TemplateFields,
    ) -> ClickatellResult<Reply> {
        let request = GatewayRequest::new(Command::SendItem)
            .param("batch_id", batch_id)
            .param("to", join_recipients(recipients)?)
            .params(fields.iter());

        self.execute(request).await
    }

    async fn quick_send<S: AsRef<str>>(
        &mut self,
        batch_id: &str,
        recipients: &[S],
    ) -> ClickatellResult<Reply> {
        let request = GatewayRequest::new(Command::QuickSend)
            .param("batch_id", batch_id)
            .param("to", join_recipients(recipients)?);

        self.execute(request).await
    }

    async fn end_batch(&mut self, batch_id: &str) -> ClickatellResult<bool> {
        let request = GatewayRequest::new(Command::EndBatch).param("batch_id", batch_id);

        self.execute(request).await?;
        Ok(true)
    }
}
