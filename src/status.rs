// ABOUTME: Clickatell gateway error codes and message delivery status codes
// ABOUTME: Error codes stay opaque strings; this table only attaches names and descriptions to them

use num_enum::TryFromPrimitive;

/// Code reported for a response that matched neither the success nor the
/// failure grammar.
pub const UNEXPECTED_RESULT_CODE: &str = "6660";

string_coded_enum! {
    /// Error codes documented for the Clickatell HTTP API.
    ///
    /// The gateway reports these in `ERR: <code>, <message>` lines. Codes are
    /// compared as strings, never parsed into integers, since the leading
    /// zeros are part of the documented code.
    pub enum GatewayErrorCode {
        AuthenticationFailed => "001", "Authentication failed";
        UnknownCredentials => "002", "Unknown username or password";
        SessionExpired => "003", "Session ID expired";
        AccountFrozen => "004", "Account frozen";
        MissingSession => "005", "Missing session ID";
        IpLockdownViolation => "007", "IP lockdown violation";
        InvalidParameters => "101", "Invalid or missing parameters";
        InvalidUserDataHeader => "102", "Invalid user data header";
        UnknownApiMessageId => "103", "Unknown API message ID";
        UnknownClientMessageId => "104", "Unknown client message ID";
        InvalidDestinationAddress => "105", "Invalid destination address";
        InvalidSourceAddress => "106", "Invalid source address";
        EmptyMessage => "107", "Empty message";
        InvalidApiId => "108", "Invalid or missing API ID";
        MissingMessageId => "109", "Missing message ID";
        EmailMessageError => "110", "Error with email message";
        InvalidProtocol => "111", "Invalid protocol";
        InvalidMessageType => "112", "Invalid message type";
        MaxMessagePartsExceeded => "113", "Maximum message parts exceeded";
        CannotRouteMessage => "114", "Cannot route message";
        MessageExpired => "115", "Message expired";
        InvalidUnicodeData => "116", "Invalid Unicode data";
        InvalidDeliveryTime => "120", "Invalid delivery time";
        DestinationBlocked => "121", "Destination mobile number blocked";
        DestinationOptedOut => "122", "Destination mobile opted out";
        InvalidSenderId => "123", "Invalid sender ID";
        NumberDelisted => "128", "Number delisted";
        MaxMtLimitExceeded => "130", "Maximum MT limit exceeded";
        InvalidBatchId => "201", "Invalid batch ID";
        NoBatchTemplate => "202", "No batch template";
        NoCreditLeft => "301", "No credit left";
        MaxAllowedCredit => "302", "Max allowed credit";
    }
}

impl GatewayErrorCode {
    /// Codes that mean the session token is no longer usable. These are the
    /// only failures the client recovers from, by re-authenticating once.
    pub fn is_session_error(self) -> bool {
        matches!(
            self,
            GatewayErrorCode::AuthenticationFailed
                | GatewayErrorCode::SessionExpired
                | GatewayErrorCode::MissingSession
        )
    }
}

/// Delivery status of a message, as reported by `querymsg`.
///
/// The gateway sends these as zero-padded three digit numbers
/// (`Status: 004`).
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageStatus {
    /// Message unknown
    Unknown = 1,
    /// Message queued
    Queued = 2,
    /// Delivered to gateway
    DeliveredToGateway = 3,
    /// Received by recipient
    ReceivedByRecipient = 4,
    /// Error with message
    MessageError = 5,
    /// User cancelled message delivery
    UserCancelled = 6,
    /// Error delivering message
    DeliveryError = 7,
    /// Message received by gateway
    Ok = 8,
    /// Routing error
    RoutingError = 9,
    /// Message expired
    Expired = 10,
    /// Message queued for later delivery
    QueuedForLater = 11,
    /// Out of credit
    OutOfCredit = 12,
    // 013 is not documented
    /// Maximum MT limit exceeded
    MaxMtLimitExceeded = 14,
}

impl MessageStatus {
    /// Decode a status code such as `"004"`.
    pub fn from_code(code: &str) -> Option<Self> {
        let value: u8 = code.trim().parse().ok()?;
        MessageStatus::try_from(value).ok()
    }

    /// True once the gateway will not change the status any more.
    pub fn is_final(self) -> bool {
        matches!(
            self,
            MessageStatus::ReceivedByRecipient
                | MessageStatus::MessageError
                | MessageStatus::UserCancelled
                | MessageStatus::DeliveryError
                | MessageStatus::RoutingError
                | MessageStatus::Expired
                | MessageStatus::OutOfCredit
                | MessageStatus::MaxMtLimitExceeded
        )
    }
}
