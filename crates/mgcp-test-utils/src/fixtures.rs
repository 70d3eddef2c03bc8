//! Pre-configured messages and addresses for transaction tests.

use mgcp_protocol::message::{MgcpRequest, MgcpResponse, TransactionId};
use mgcp_protocol::params::MgcpParameterType;
use mgcp_protocol::verb::MgcpRequestType;
use std::net::SocketAddr;

/// Transaction id used throughout the reference traffic captures.
pub const REFERENCE_TRANSACTION_ID: TransactionId = TransactionId::new(147_483_653);

/// Wildcard bridge endpoint addressed by the reference CRCX.
pub const BRIDGE_ENDPOINT: &str = "switchboard/bridge/$@127.0.0.1:2427";

/// Call agent side of the test peering.
///
/// # Panics
///
/// Never; the literal always parses.
pub fn call_agent_addr() -> SocketAddr {
    "127.0.0.1:2727".parse().expect("Valid socket address")
}

/// Gateway side of the test peering.
///
/// # Panics
///
/// Never; the literal always parses.
pub fn gateway_addr() -> SocketAddr {
    "127.0.0.1:2427".parse().expect("Valid socket address")
}

/// `CRCX 147483653 switchboard/bridge/$@127.0.0.1:2427 MGCP 1.0` with call
/// id and mode parameters, as captured from reference traffic.
pub fn crcx_request() -> MgcpRequest {
    let mut request = MgcpRequest::new(REFERENCE_TRANSACTION_ID, MgcpRequestType::Crcx, BRIDGE_ENDPOINT);
    request.parameters.put(MgcpParameterType::CallId, "1");
    request.parameters.put(MgcpParameterType::Mode, "sendrecv");
    request
}

/// A request of the given verb and id against the bridge endpoint.
pub fn request(id: u32, verb: MgcpRequestType) -> MgcpRequest {
    MgcpRequest::new(TransactionId::new(id), verb, BRIDGE_ENDPOINT)
}

/// An outgoing request still awaiting identifier assignment.
pub fn unassigned_request(verb: MgcpRequestType) -> MgcpRequest {
    MgcpRequest::new(TransactionId::UNASSIGNED, verb, BRIDGE_ENDPOINT)
}

/// `200 <id> Successful Transaction`.
pub fn success_response(id: TransactionId) -> MgcpResponse {
    MgcpResponse::new(id, 200, "Successful Transaction")
}
