// ABOUTME: Core Clickatell client traits using native async functions
// ABOUTME: Defines the transport seam and one interface per group of gateway commands

use crate::client::error::ClickatellResult;
use crate::client::types::TemplateFields;
use crate::response::{Reply, StatusReport};
use bytes::Bytes;

/// HTTP transport used to reach the gateway
///
/// Implementations issue one GET request and return the raw response body.
/// Timeouts and connection reuse are the transport's concern; the client
/// above it only interprets bodies and decides whether to retry.
pub trait Transport {
    /// Issue `GET <base>/<path>?<params>` and return the response body.
    ///
    /// Non-success HTTP statuses are errors. The body of a success status is
    /// returned as-is, including gateway `ERR:` lines.
    async fn get(&self, path: &str, params: &[(String, String)]) -> crate::Result<Bytes>;
}

/// Session management
///
/// Every other operation authenticates on demand, so calling
/// `authenticate` explicitly is only needed to fail early on bad
/// credentials or to force a fresh session.
pub trait GatewaySession {
    /// Return the cached session id, or authenticate to obtain one
    ///
    /// With `force` set, the cached session is discarded first.
    async fn authenticate(&mut self, force: bool) -> ClickatellResult<String>;

    /// Ping the gateway to keep the session alive
    ///
    /// Returns `true` if the gateway answered with success and `false` if it
    /// reported a failure. Transport failures are returned as errors.
    async fn ping(&mut self) -> ClickatellResult<bool>;

    /// Drop the cached session id; the next operation re-authenticates
    fn invalidate_session(&mut self);
}

/// Single message operations
pub trait MessageSender: GatewaySession {
    /// Send one text message, returning the API message id
    async fn send(&mut self, to: &str, text: &str) -> ClickatellResult<String>;

    /// Query the delivery status of a message sent earlier
    async fn query(&mut self, message_id: &str) -> ClickatellResult<StatusReport>;
}

/// Batch messaging operations
///
/// A batch is opened with a message template, then items are sent against
/// its batch id, and finally the batch is closed.
pub trait BatchSender: GatewaySession {
    /// Open a batch for `template`, returning the batch id
    async fn start_batch(&mut self, template: &str) -> ClickatellResult<String>;

    /// Send the template to `recipients` with `fields` substituted
    async fn send_item<S: AsRef<str>>(
        &mut self,
        batch_id: &str,
        recipients: &[S],
        fields: &TemplateFields,
    ) -> ClickatellResult<Reply>;

    /// Send the template unchanged to `recipients`
    async fn quick_send<S: AsRef<str>>(
        &mut self,
        batch_id: &str,
        recipients: &[S],
    ) -> ClickatellResult<Reply>;

    /// Close a batch
    async fn end_batch(&mut self, batch_id: &str) -> ClickatellResult<bool>;

    /// Open a batch, send one item to all recipients and close it again
    ///
    /// Returns `false` when the gateway rejected some of the recipients; the
    /// batch is still closed. Not atomic: if sending the item fails outright
    /// the error is returned and the batch is left open.
    async fn send_bulk<S: AsRef<str>>(
        &mut self,
        recipients: &[S],
        template: &str,
        fields: &TemplateFields,
    ) -> ClickatellResult<bool> {
        let batch_id = self.start_batch(template).await?;
        let reply = self.send_item(&batch_id, recipients, fields).await?;
        let ended = self.end_batch(&batch_id).await?;
        Ok(ended && reply.is_complete())
    }
}
