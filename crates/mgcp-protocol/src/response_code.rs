//! MGCP return code catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Return codes defined by RFC 3435 section 2.4.
///
/// Codes 100-199 are provisional, 200-299 indicate success, 400-499 are
/// transient errors and 500-599 are permanent errors. Responses on the wire
/// may carry codes outside this catalog (extensions), so messages store the
/// raw `u16` and this enum names the codes the stack itself emits or
/// inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MgcpResponseCode {
    /// Response acknowledgement.
    Acknowledgement,
    /// The transaction is currently being executed.
    TransactionBeingExecuted,
    /// The transaction has been queued for execution.
    TransactionQueued,
    /// The requested transaction was executed normally.
    TransactionWasExecuted,
    /// The connection was deleted.
    ConnectionWasDeleted,
    /// The transaction could not be executed due to a transient error.
    TransientError,
    /// Insufficient resources at this time.
    InsufficientResources,
    /// Insufficient bandwidth at this time.
    InsufficientBandwidth,
    /// The transaction could not be executed because the endpoint is
    /// restarting.
    EndpointRestarting,
    /// Transaction time-out.
    Timeout,
    /// Transaction aborted.
    Aborted,
    /// The transaction could not be executed due to internal overload.
    Overloaded,
    /// No endpoint available to satisfy an "any of" wildcard.
    EndpointNotAvailable,
    /// The endpoint is unknown.
    EndpointUnknown,
    /// The endpoint is not ready.
    EndpointNotReady,
    /// The endpoint does not have sufficient resources.
    EndpointInsufficientResources,
    /// An "all of" wildcard was too complicated.
    WildcardTooComplicated,
    /// Unknown or unsupported command.
    UnknownCommand,
    /// Unsupported remote connection descriptor.
    UnsupportedSdp,
    /// The transaction could not be executed due to a protocol error.
    ProtocolError,
    /// Incorrect connection identifier.
    IncorrectConnectionId,
    /// Unknown call identifier.
    IncorrectCallId,
    /// Unsupported or invalid connection mode.
    InvalidMode,
    /// Unsupported or unknown package.
    UnknownPackage,
    /// The endpoint was redirected to another call agent.
    EndpointRedirected,
    /// No such event or signal.
    NoSuchEventOrSignal,
    /// Internal inconsistency in local connection options.
    ErrorInLocalOptions,
    /// Missing remote connection descriptor.
    MissingRemoteDescriptor,
}

impl MgcpResponseCode {
    /// Numeric return code carried on the response line.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            MgcpResponseCode::Acknowledgement => 0,
            MgcpResponseCode::TransactionBeingExecuted => 100,
            MgcpResponseCode::TransactionQueued => 101,
            MgcpResponseCode::TransactionWasExecuted => 200,
            MgcpResponseCode::ConnectionWasDeleted => 250,
            MgcpResponseCode::TransientError => 400,
            MgcpResponseCode::InsufficientResources => 403,
            MgcpResponseCode::InsufficientBandwidth => 404,
            MgcpResponseCode::EndpointRestarting => 405,
            MgcpResponseCode::Timeout => 406,
            MgcpResponseCode::Aborted => 407,
            MgcpResponseCode::Overloaded => 409,
            MgcpResponseCode::EndpointNotAvailable => 410,
            MgcpResponseCode::EndpointUnknown => 500,
            MgcpResponseCode::EndpointNotReady => 501,
            MgcpResponseCode::EndpointInsufficientResources => 502,
            MgcpResponseCode::WildcardTooComplicated => 503,
            MgcpResponseCode::UnknownCommand => 504,
            MgcpResponseCode::UnsupportedSdp => 505,
            MgcpResponseCode::ProtocolError => 510,
            MgcpResponseCode::IncorrectConnectionId => 515,
            MgcpResponseCode::IncorrectCallId => 516,
            MgcpResponseCode::InvalidMode => 517,
            MgcpResponseCode::UnknownPackage => 518,
            MgcpResponseCode::EndpointRedirected => 521,
            MgcpResponseCode::NoSuchEventOrSignal => 522,
            MgcpResponseCode::ErrorInLocalOptions => 524,
            MgcpResponseCode::MissingRemoteDescriptor => 527,
        }
    }

    /// Human-readable text carried on the response line.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            MgcpResponseCode::Acknowledgement => "Acknowledgement",
            MgcpResponseCode::TransactionBeingExecuted => {
                "Transaction is currently being executed"
            }
            MgcpResponseCode::TransactionQueued => "Transaction has been queued for execution",
            MgcpResponseCode::TransactionWasExecuted => "Successful Transaction",
            MgcpResponseCode::ConnectionWasDeleted => "Connection was deleted",
            MgcpResponseCode::TransientError => "Transient error",
            MgcpResponseCode::InsufficientResources => "Insufficient resources",
            MgcpResponseCode::InsufficientBandwidth => "Insufficient bandwidth",
            MgcpResponseCode::EndpointRestarting => "Endpoint restarting",
            MgcpResponseCode::Timeout => "Transaction time-out",
            MgcpResponseCode::Aborted => "Transaction aborted",
            MgcpResponseCode::Overloaded => "Internal overload",
            MgcpResponseCode::EndpointNotAvailable => "No endpoint available",
            MgcpResponseCode::EndpointUnknown => "Endpoint unknown",
            MgcpResponseCode::EndpointNotReady => "Endpoint not ready",
            MgcpResponseCode::EndpointInsufficientResources => {
                "Endpoint does not have sufficient resources"
            }
            MgcpResponseCode::WildcardTooComplicated => "Wildcard too complicated",
            MgcpResponseCode::UnknownCommand => "Unknown or unsupported command",
            MgcpResponseCode::UnsupportedSdp => "Unsupported remote connection descriptor",
            MgcpResponseCode::ProtocolError => "Protocol error",
            MgcpResponseCode::IncorrectConnectionId => "Incorrect connection identifier",
            MgcpResponseCode::IncorrectCallId => "Unknown call identifier",
            MgcpResponseCode::InvalidMode => "Unsupported or invalid mode",
            MgcpResponseCode::UnknownPackage => "Unsupported or unknown package",
            MgcpResponseCode::EndpointRedirected => "Endpoint redirected",
            MgcpResponseCode::NoSuchEventOrSignal => "No such event or signal",
            MgcpResponseCode::ErrorInLocalOptions => "Inconsistency in local connection options",
            MgcpResponseCode::MissingRemoteDescriptor => "Missing remote connection descriptor",
        }
    }

    /// Look up a catalog entry by numeric code.
    #[must_use]
    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(MgcpResponseCode::Acknowledgement),
            100 => Some(MgcpResponseCode::TransactionBeingExecuted),
            101 => Some(MgcpResponseCode::TransactionQueued),
            200 => Some(MgcpResponseCode::TransactionWasExecuted),
            250 => Some(MgcpResponseCode::ConnectionWasDeleted),
            400 => Some(MgcpResponseCode::TransientError),
            403 => Some(MgcpResponseCode::InsufficientResources),
            404 => Some(MgcpResponseCode::InsufficientBandwidth),
            405 => Some(MgcpResponseCode::EndpointRestarting),
            406 => Some(MgcpResponseCode::Timeout),
            407 => Some(MgcpResponseCode::Aborted),
            409 => Some(MgcpResponseCode::Overloaded),
            410 => Some(MgcpResponseCode::EndpointNotAvailable),
            500 => Some(MgcpResponseCode::EndpointUnknown),
            501 => Some(MgcpResponseCode::EndpointNotReady),
            502 => Some(MgcpResponseCode::EndpointInsufficientResources),
            503 => Some(MgcpResponseCode::WildcardTooComplicated),
            504 => Some(MgcpResponseCode::UnknownCommand),
            505 => Some(MgcpResponseCode::UnsupportedSdp),
            510 => Some(MgcpResponseCode::ProtocolError),
            515 => Some(MgcpResponseCode::IncorrectConnectionId),
            516 => Some(MgcpResponseCode::IncorrectCallId),
            517 => Some(MgcpResponseCode::InvalidMode),
            518 => Some(MgcpResponseCode::UnknownPackage),
            521 => Some(MgcpResponseCode::EndpointRedirected),
            522 => Some(MgcpResponseCode::NoSuchEventOrSignal),
            524 => Some(MgcpResponseCode::ErrorInLocalOptions),
            527 => Some(MgcpResponseCode::MissingRemoteDescriptor),
            _ => None,
        }
    }
}

impl fmt::Display for MgcpResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.message())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_code() {
        assert_eq!(MgcpResponseCode::TransactionWasExecuted.code(), 200);
        assert_eq!(
            MgcpResponseCode::TransactionWasExecuted.message(),
            "Successful Transaction"
        );
    }

    #[test]
    fn test_protocol_error_code() {
        assert_eq!(MgcpResponseCode::ProtocolError.code(), 510);
        assert_eq!(MgcpResponseCode::ProtocolError.message(), "Protocol error");
    }

    #[test]
    fn test_from_code_round_trip() {
        let codes = [0, 100, 101, 200, 250, 400, 406, 410, 500, 510, 521, 527];
        for code in codes {
            let entry = MgcpResponseCode::from_code(code).unwrap();
            assert_eq!(entry.code(), code);
        }
    }

    #[test]
    fn test_from_code_rejects_unknown() {
        assert_eq!(MgcpResponseCode::from_code(299), None);
        assert_eq!(MgcpResponseCode::from_code(999), None);
    }

    #[test]
    fn test_display_renders_code_and_message() {
        assert_eq!(
            MgcpResponseCode::TransactionWasExecuted.to_string(),
            "200 Successful Transaction"
        );
    }
}
