// ABOUTME: Enumerates the Clickatell HTTP API commands and the endpoint path each one targets
// ABOUTME: Also tells the client which commands need a session_id injected at dispatch time

use std::fmt;

/// A Clickatell HTTP API command.
///
/// Each variant maps onto exactly one endpoint of the legacy HTTP API. The
/// plain messaging commands live under `/http`, the batch commands under
/// `/http_batch`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    Auth,
    Ping,
    SendMsg,
    QueryMsg,
    StartBatch,
    SendItem,
    QuickSend,
    EndBatch,
}

impl Command {
    /// Request path relative to the gateway host
    pub fn path(self) -> &'static str {
        match self {
            Command::Auth => "/http/auth",
            Command::Ping => "/http/ping",
            Command::SendMsg => "/http/sendmsg",
            Command::QueryMsg => "/http/querymsg",
            Command::StartBatch => "/http_batch/startbatch",
            Command::SendItem => "/http_batch/senditem",
            Command::QuickSend => "/http_batch/quicksend",
            Command::EndBatch => "/http_batch/endbatch",
        }
    }

    /// Every command except `auth` is issued within a session.
    pub fn requires_session(self) -> bool {
        !matches!(self, Command::Auth)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Command::Auth => "auth",
            Command::Ping => "ping",
            Command::SendMsg => "sendmsg",
            Command::QueryMsg => "querymsg",
            Command::StartBatch => "startbatch",
            Command::SendItem => "senditem",
            Command::QuickSend => "quicksend",
            Command::EndBatch => "endbatch",
        };
        f.write_str(name)
    }
}
