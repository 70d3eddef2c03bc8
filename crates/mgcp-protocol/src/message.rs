//! MGCP request and response messages.

use crate::params::Parameters;
use crate::response_code::MgcpResponseCode;
use crate::verb::MgcpRequestType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Protocol version string carried on every request line.
pub const MGCP_VERSION: &str = "MGCP 1.0";

/// Identifier correlating an MGCP request with its response.
///
/// Valid identifiers run from 1 to 2^31 - 1. Zero is reserved to mark a
/// locally-originated request that has not been assigned an identifier yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub u32);

impl TransactionId {
    /// Reserved identifier for requests awaiting assignment.
    pub const UNASSIGNED: TransactionId = TransactionId(0);

    /// Largest identifier the protocol allows.
    pub const MAX: TransactionId = TransactionId(2_147_483_647);

    /// Create a transaction identifier.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Whether this is the reserved unassigned identifier.
    #[must_use]
    pub const fn is_unassigned(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of a message relative to this entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageDirection {
    /// Received from the peer.
    Incoming,
    /// Produced locally, to be sent to the peer.
    Outgoing,
}

impl fmt::Display for MessageDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageDirection::Incoming => f.write_str("incoming"),
            MessageDirection::Outgoing => f.write_str("outgoing"),
        }
    }
}

/// An MGCP command request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MgcpRequest {
    /// Transaction identifier; zero until assigned for local requests.
    pub transaction_id: TransactionId,
    /// Command verb.
    pub request_type: MgcpRequestType,
    /// Endpoint the command addresses, possibly wildcarded.
    pub endpoint_id: String,
    /// Parameter lines.
    pub parameters: Parameters,
}

impl MgcpRequest {
    /// Create a request with no parameters.
    #[must_use]
    pub fn new(
        transaction_id: TransactionId,
        request_type: MgcpRequestType,
        endpoint_id: impl Into<String>,
    ) -> Self {
        Self {
            transaction_id,
            request_type,
            endpoint_id: endpoint_id.into(),
            parameters: Parameters::new(),
        }
    }
}

/// Renders the request command line, e.g.
/// `CRCX 147483653 switchboard/bridge/$@127.0.0.1:2427 MGCP 1.0`.
impl fmt::Display for MgcpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.request_type, self.transaction_id, self.endpoint_id, MGCP_VERSION
        )
    }
}

/// An MGCP command response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MgcpResponse {
    /// Transaction identifier of the request being answered.
    pub transaction_id: TransactionId,
    /// Numeric return code.
    pub code: u16,
    /// Human-readable return text.
    pub text: String,
    /// Parameter lines.
    pub parameters: Parameters,
}

impl MgcpResponse {
    /// Create a response with no parameters.
    #[must_use]
    pub fn new(transaction_id: TransactionId, code: u16, text: impl Into<String>) -> Self {
        Self {
            transaction_id,
            code,
            text: text.into(),
            parameters: Parameters::new(),
        }
    }

    /// Create a response from a catalog return code.
    #[must_use]
    pub fn from_code(transaction_id: TransactionId, code: MgcpResponseCode) -> Self {
        Self::new(transaction_id, code.code(), code.message())
    }
}

/// Renders the response line, e.g. `200 147483653 Successful Transaction`.
impl fmt::Display for MgcpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.code, self.transaction_id, self.text)
    }
}

/// Either kind of MGCP message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MgcpMessage {
    /// A command request.
    Request(MgcpRequest),
    /// A command response.
    Response(MgcpResponse),
}

impl MgcpMessage {
    /// Transaction identifier carried by the message.
    #[must_use]
    pub fn transaction_id(&self) -> TransactionId {
        match self {
            MgcpMessage::Request(request) => request.transaction_id,
            MgcpMessage::Response(response) => response.transaction_id,
        }
    }

    /// Whether the message is a request.
    #[must_use]
    pub fn is_request(&self) -> bool {
        matches!(self, MgcpMessage::Request(_))
    }
}

impl From<MgcpRequest> for MgcpMessage {
    fn from(request: MgcpRequest) -> Self {
        MgcpMessage::Request(request)
    }
}

impl From<MgcpResponse> for MgcpMessage {
    fn from(response: MgcpResponse) -> Self {
        MgcpMessage::Response(response)
    }
}

impl fmt::Display for MgcpMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MgcpMessage::Request(request) => request.fmt(f),
            MgcpMessage::Response(response) => response.fmt(f),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::params::MgcpParameterType;

    #[test]
    fn test_transaction_id_bounds() {
        assert!(TransactionId::UNASSIGNED.is_unassigned());
        assert!(!TransactionId::new(1).is_unassigned());
        assert_eq!(TransactionId::MAX.value(), 2_147_483_647);
    }

    #[test]
    fn test_request_display_renders_command_line() {
        let request = MgcpRequest::new(
            TransactionId::new(147_483_653),
            MgcpRequestType::Crcx,
            "switchboard/bridge/$@127.0.0.1:2427",
        );

        assert_eq!(
            request.to_string(),
            "CRCX 147483653 switchboard/bridge/$@127.0.0.1:2427 MGCP 1.0"
        );
    }

    #[test]
    fn test_response_display_renders_response_line() {
        let response = MgcpResponse::from_code(
            TransactionId::new(147_483_653),
            MgcpResponseCode::TransactionWasExecuted,
        );

        assert_eq!(response.to_string(), "200 147483653 Successful Transaction");
    }

    #[test]
    fn test_message_accessors() {
        let request = MgcpRequest::new(
            TransactionId::new(5),
            MgcpRequestType::Ntfy,
            "switchboard/ivr/1@127.0.0.1:2427",
        );
        let response = MgcpResponse::from_code(
            TransactionId::new(6),
            MgcpResponseCode::TransactionWasExecuted,
        );

        let request_message = MgcpMessage::from(request);
        let response_message = MgcpMessage::from(response);

        assert!(request_message.is_request());
        assert_eq!(request_message.transaction_id(), TransactionId::new(5));
        assert!(!response_message.is_request());
        assert_eq!(response_message.transaction_id(), TransactionId::new(6));
    }

    #[test]
    fn test_messages_serialize_to_json() {
        let mut request = MgcpRequest::new(
            TransactionId::new(147_483_653),
            MgcpRequestType::Crcx,
            "switchboard/bridge/$@127.0.0.1:2427",
        );
        request
            .parameters
            .put(MgcpParameterType::CallId, "1");
        request.parameters.put(MgcpParameterType::Mode, "sendrecv");

        let encoded = serde_json::to_string(&MgcpMessage::from(request.clone())).unwrap();
        let decoded: MgcpMessage = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded, MgcpMessage::Request(request));
    }
}
