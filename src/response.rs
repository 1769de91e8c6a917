// ABOUTME: Interprets the plain text bodies returned by the Clickatell HTTP API
// ABOUTME: Classifies each body as a single id, a list of batch ids, or a gateway failure

use crate::client::error::{ClickatellError, ClickatellResult};
use crate::status::MessageStatus;
use tracing::{debug, warn};

/// A successfully interpreted gateway response.
///
/// Commands addressed to one recipient (and session commands such as `auth`)
/// answer with a single `OK:` or `ID:` line. Batch commands addressed to
/// several recipients answer with one line per recipient, each either
/// `ID: <id> To: <recipient>` or `ERR: <code>, <message> To: <recipient>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Exactly one line, and it succeeded; the identifier without any `To:` suffix
    Single(String),
    /// One entry per line, in the order the gateway sent them. Individual
    /// recipients may have been rejected.
    Multiple(Vec<ReplyItem>),
}

/// Result for one recipient of a multi-line reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Accepted, with the identifier assigned by the gateway
    Accepted { id: String },
    /// Rejected with the code and message from its `ERR:` line
    Rejected { code: String, message: String },
}

/// One line of a multi-recipient reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyItem {
    /// Text following `To:`, normally the recipient number. Empty if absent.
    pub to: String,
    pub outcome: ItemOutcome,
}

impl ReplyItem {
    pub fn accepted(id: impl Into<String>, to: impl Into<String>) -> Self {
        ReplyItem {
            to: to.into(),
            outcome: ItemOutcome::Accepted { id: id.into() },
        }
    }

    pub fn rejected(
        code: impl Into<String>,
        message: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        ReplyItem {
            to: to.into(),
            outcome: ItemOutcome::Rejected {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    /// Identifier assigned by the gateway, if this recipient was accepted
    pub fn id(&self) -> Option<&str> {
        match &self.outcome {
            ItemOutcome::Accepted { id } => Some(id),
            ItemOutcome::Rejected { .. } => None,
        }
    }

    /// The rejection as an error, if this recipient was rejected
    pub fn error(&self) -> Option<ClickatellError> {
        match &self.outcome {
            ItemOutcome::Accepted { .. } => None,
            ItemOutcome::Rejected { code, message } => {
                Some(ClickatellError::gateway(code.as_str(), message.as_str()))
            }
        }
    }
}

impl Reply {
    /// Identifiers of the accepted recipients, in response order
    pub fn ids(&self) -> Vec<&str> {
        match self {
            Reply::Single(id) => vec![id.as_str()],
            Reply::Multiple(items) => items.iter().filter_map(ReplyItem::id).collect(),
        }
    }

    /// Entries the gateway rejected
    pub fn failures(&self) -> Vec<&ReplyItem> {
        match self {
            Reply::Single(_) => Vec::new(),
            Reply::Multiple(items) => items.iter().filter(|item| item.id().is_none()).collect(),
        }
    }

    /// True when no recipient was rejected
    pub fn is_complete(&self) -> bool {
        self.failures().is_empty()
    }

    /// Consume a reply that must carry exactly one identifier
    ///
    /// Commands such as `auth` or `startbatch` answer with one line; several
    /// lines mean the request addressed more than one recipient and the
    /// caller needs the whole [`Reply`].
    pub fn into_single_id(self) -> ClickatellResult<String> {
        match self {
            Reply::Single(id) => Ok(id),
            Reply::Multiple(items) => {
                let lines: Vec<String> = items
                    .iter()
                    .map(|item| match &item.outcome {
                        ItemOutcome::Accepted { id } => format!("{id} to {}", item.to),
                        ItemOutcome::Rejected { code, .. } => format!("ERR {code} to {}", item.to),
                    })
                    .collect();
                Err(ClickatellError::InvalidData(format!(
                    "Expected a single id, gateway answered {} lines: {}",
                    items.len(),
                    lines.join(", ")
                )))
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Reply::Single(_) => 1,
            Reply::Multiple(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Success { id: &'a str, to: Option<&'a str> },
    Failure {
        code: &'a str,
        message: &'a str,
        to: Option<&'a str>,
    },
    Other,
}

/// Split off a trailing ` To: <recipient>` suffix
fn split_recipient(text: &str) -> (&str, Option<&str>) {
    match text.rsplit_once("To:") {
        Some((head, to)) => (head.trim(), Some(to.trim())),
        None => (text.trim(), None),
    }
}

fn classify(line: &str) -> Line<'_> {
    if let Some(rest) = line.strip_prefix("OK:").or_else(|| line.strip_prefix("ID:")) {
        let (id, to) = split_recipient(rest);
        return Line::Success { id, to };
    }

    if let Some(rest) = line.strip_prefix("ERR:") {
        let (trimmed, to) = split_recipient(rest);
        let digits = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        // The code is only recognised when directly followed by a comma
        if digits > 0 {
            if let Some(message) = trimmed[digits..].strip_prefix(',') {
                return Line::Failure {
                    code: &trimmed[..digits],
                    message: message.trim(),
                    to,
                };
            }
        }
        return Line::Failure {
            code: "",
            message: trimmed,
            to,
        };
    }

    Line::Other
}

/// Interpret a response body.
///
/// A one-line body is either a [`Reply::Single`] or the failure it reports.
/// In a longer body every line is kept as a [`ReplyItem`], rejected
/// recipients included, as long as at least one line succeeded. When no
/// line succeeds the first `ERR:` line becomes a
/// [`ClickatellError::Gateway`]; a body with neither is a
/// [`ClickatellError::UnexpectedResponse`].
pub fn interpret(body: &str) -> ClickatellResult<Reply> {
    let mut items = Vec::new();
    let mut accepted = 0;
    let mut first_failure = None;

    for line in body.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match classify(line) {
            Line::Success { id, to } => {
                accepted += 1;
                items.push(ReplyItem::accepted(id, to.unwrap_or_default()));
            }
            Line::Failure { code, message, to } => {
                first_failure.get_or_insert((code, message));
                items.push(ReplyItem::rejected(code, message, to.unwrap_or_default()));
            }
            Line::Other => debug!("Ignoring unrecognised response line: {}", line),
        }
    }

    if accepted == 0 {
        if items.len() > 1 {
            warn!("All {} recipients rejected", items.len());
        }
        return match first_failure {
            Some((code, message)) => Err(ClickatellError::gateway(code, message)),
            None => Err(ClickatellError::UnexpectedResponse {
                body: body.trim().to_string(),
            }),
        };
    }

    if items.len() == 1 {
        if let Some(ItemOutcome::Accepted { id }) = items.pop().map(|item| item.outcome) {
            return Ok(Reply::Single(id));
        }
    }

    let failed = items.len() - accepted;
    if failed > 0 {
        warn!("{} of {} recipients rejected", failed, items.len());
    }

    Ok(Reply::Multiple(items))
}

/// Interpret a raw response body as received from the transport.
pub fn decode(body: &[u8]) -> ClickatellResult<Reply> {
    let text = std::str::from_utf8(body)
        .map_err(|e| ClickatellError::Transport(format!("Response is not UTF-8: {e}")))?;
    interpret(text)
}

/// Status of a previously sent message, as answered by `querymsg`.
///
/// The gateway answers `ID: <apimsgid> Status: <code>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    /// API message id the status refers to
    pub message_id: String,
    /// Status code as reported, e.g. `"004"`. Empty if the gateway sent none.
    pub raw_status: String,
    /// Decoded status, when the code is a documented one
    pub status: Option<MessageStatus>,
}

impl StatusReport {
    pub fn parse(text: &str) -> Self {
        let (message_id, raw_status) = match text.split_once("Status:") {
            Some((id, status)) => (id.trim(), status.trim()),
            None => (text.trim(), ""),
        };

        StatusReport {
            message_id: message_id.to_string(),
            raw_status: raw_status.to_string(),
            status: MessageStatus::from_code(raw_status),
        }
    }
}
