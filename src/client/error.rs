// ABOUTME: Clickatell client error types for structured error handling across all gateway operations
// ABOUTME: Keeps gateway error codes as strings and converts transport failures from the HTTP layer

use crate::status::{GatewayErrorCode, UNEXPECTED_RESULT_CODE};
use std::fmt;
use thiserror::Error;

/// Comprehensive error type for Clickatell client operations
///
/// Every failure carries enough structure for the caller to act on it:
/// gateway failures keep the code and message exactly as reported, and
/// responses that could not be understood keep the raw body.
#[derive(Debug, Error)]
pub enum ClickatellError {
    /// Required configuration missing or invalid (raised before any request)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure reported by the gateway in an `ERR:` line
    #[error("Gateway error {code}: {message}")]
    Gateway { code: String, message: String },

    /// Response matched neither the success nor the failure grammar
    #[error("Unexpected result: {body}")]
    UnexpectedResponse { body: String },

    /// The HTTP request itself failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request did not complete within the configured timeout
    #[error("Operation timeout")]
    Timeout,

    /// Data validation error (empty recipient list, non UTF-8 body, ...)
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl ClickatellError {
    pub(crate) fn gateway(code: impl Into<String>, message: impl Into<String>) -> Self {
        ClickatellError::Gateway {
            code: code.into(),
            message: message.into(),
        }
    }

    /// The error code, if this error carries one.
    ///
    /// Gateway failures return the code as reported (possibly empty when the
    /// gateway omitted it). Unexpected responses return the fixed `"6660"`.
    pub fn code(&self) -> Option<&str> {
        match self {
            ClickatellError::Gateway { code, .. } => Some(code),
            ClickatellError::UnexpectedResponse { .. } => Some(UNEXPECTED_RESULT_CODE),
            _ => None,
        }
    }

    /// The documented gateway code this error corresponds to, if any
    pub fn gateway_code(&self) -> Option<GatewayErrorCode> {
        match self {
            ClickatellError::Gateway { code, .. } => GatewayErrorCode::from_code(code),
            _ => None,
        }
    }

    /// True for the gateway failures that mean the session must be renewed
    pub fn is_session_error(&self) -> bool {
        self.gateway_code()
            .is_some_and(GatewayErrorCode::is_session_error)
    }

    /// True when the gateway understood the request and reported a result,
    /// as opposed to the request never completing.
    pub fn is_gateway_reported(&self) -> bool {
        matches!(
            self,
            ClickatellError::Gateway { .. } | ClickatellError::UnexpectedResponse { .. }
        )
    }
}

/// Result type alias for Clickatell operations
pub type ClickatellResult<T> = Result<T, ClickatellError>;

impl From<Box<dyn std::error::Error + Send + Sync>> for ClickatellError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        match err.downcast::<ClickatellError>() {
            Ok(err) => *err,
            Err(err) => ClickatellError::Transport(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for ClickatellError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClickatellError::Timeout
        } else if err.is_builder() {
            ClickatellError::Config(err.to_string())
        } else {
            ClickatellError::Transport(err.to_string())
        }
    }
}

/// Formats an error's code with its documented description, for log lines.
pub(crate) struct ErrorCodeDisplay<'a>(pub &'a ClickatellError);

impl fmt::Display for ErrorCodeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.code() {
            Some(code) => match GatewayErrorCode::from_code(code) {
                Some(known) => write!(f, "{code} ({})", known.description()),
                None => f.write_str(code),
            },
            None => f.write_str("-"),
        }
    }
}
