//! MGCP parameter lines.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Parameter line types defined by RFC 3435 section 3.2.2.
///
/// The session description is not a header line on the wire, but it travels
/// with the message and is keyed here under [`MgcpParameterType::Sdp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MgcpParameterType {
    /// B: Bearer information
    BearerInformation,
    /// C: Call identifier
    CallId,
    /// I: Connection identifier
    ConnectionId,
    /// I2: Second connection identifier
    SecondConnectionId,
    /// N: Notified entity
    NotifiedEntity,
    /// X: Request identifier
    RequestId,
    /// L: Local connection options
    LocalConnectionOptions,
    /// M: Connection mode
    Mode,
    /// R: Requested events
    RequestedEvents,
    /// S: Signal requests
    RequestedSignals,
    /// D: Digit map
    DigitMap,
    /// O: Observed events
    ObservedEvents,
    /// P: Connection parameters
    ConnectionParameters,
    /// E: Reason code
    ReasonCode,
    /// Z: Specific endpoint identifier
    SpecificEndpointId,
    /// Z2: Second endpoint identifier
    SecondEndpointId,
    /// F: Requested info
    RequestedInfo,
    /// Q: Quarantine handling
    QuarantineHandling,
    /// T: Detect events
    DetectEvents,
    /// RM: Restart method
    RestartMethod,
    /// RD: Restart delay
    RestartDelay,
    /// A: Capabilities
    Capabilities,
    /// ES: Event states
    EventStates,
    /// PL: Package list
    PackageList,
    /// MD: Maximum MGCP datagram size
    MaxMgcpDatagram,
    /// Session description carried after the parameter lines
    Sdp,
}

impl MgcpParameterType {
    /// Parameter code as it appears at the start of the line.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            MgcpParameterType::BearerInformation => "B",
            MgcpParameterType::CallId => "C",
            MgcpParameterType::ConnectionId => "I",
            MgcpParameterType::SecondConnectionId => "I2",
            MgcpParameterType::NotifiedEntity => "N",
            MgcpParameterType::RequestId => "X",
            MgcpParameterType::LocalConnectionOptions => "L",
            MgcpParameterType::Mode => "M",
            MgcpParameterType::RequestedEvents => "R",
            MgcpParameterType::RequestedSignals => "S",
            MgcpParameterType::DigitMap => "D",
            MgcpParameterType::ObservedEvents => "O",
            MgcpParameterType::ConnectionParameters => "P",
            MgcpParameterType::ReasonCode => "E",
            MgcpParameterType::SpecificEndpointId => "Z",
            MgcpParameterType::SecondEndpointId => "Z2",
            MgcpParameterType::RequestedInfo => "F",
            MgcpParameterType::QuarantineHandling => "Q",
            MgcpParameterType::DetectEvents => "T",
            MgcpParameterType::RestartMethod => "RM",
            MgcpParameterType::RestartDelay => "RD",
            MgcpParameterType::Capabilities => "A",
            MgcpParameterType::EventStates => "ES",
            MgcpParameterType::PackageList => "PL",
            MgcpParameterType::MaxMgcpDatagram => "MD",
            MgcpParameterType::Sdp => "sdp",
        }
    }
}

impl fmt::Display for MgcpParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error parsing an MGCP parameter code.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unrecognized MGCP parameter: {0}")]
pub struct UnrecognizedParameter(pub String);

impl FromStr for MgcpParameterType {
    type Err = UnrecognizedParameter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "B" => Ok(MgcpParameterType::BearerInformation),
            "C" => Ok(MgcpParameterType::CallId),
            "I" => Ok(MgcpParameterType::ConnectionId),
            "I2" => Ok(MgcpParameterType::SecondConnectionId),
            "N" => Ok(MgcpParameterType::NotifiedEntity),
            "X" => Ok(MgcpParameterType::RequestId),
            "L" => Ok(MgcpParameterType::LocalConnectionOptions),
            "M" => Ok(MgcpParameterType::Mode),
            "R" => Ok(MgcpParameterType::RequestedEvents),
            "S" => Ok(MgcpParameterType::RequestedSignals),
            "D" => Ok(MgcpParameterType::DigitMap),
            "O" => Ok(MgcpParameterType::ObservedEvents),
            "P" => Ok(MgcpParameterType::ConnectionParameters),
            "E" => Ok(MgcpParameterType::ReasonCode),
            "Z" => Ok(MgcpParameterType::SpecificEndpointId),
            "Z2" => Ok(MgcpParameterType::SecondEndpointId),
            "F" => Ok(MgcpParameterType::RequestedInfo),
            "Q" => Ok(MgcpParameterType::QuarantineHandling),
            "T" => Ok(MgcpParameterType::DetectEvents),
            "RM" => Ok(MgcpParameterType::RestartMethod),
            "RD" => Ok(MgcpParameterType::RestartDelay),
            "A" => Ok(MgcpParameterType::Capabilities),
            "ES" => Ok(MgcpParameterType::EventStates),
            "PL" => Ok(MgcpParameterType::PackageList),
            "MD" => Ok(MgcpParameterType::MaxMgcpDatagram),
            "sdp" => Ok(MgcpParameterType::Sdp),
            other => Err(UnrecognizedParameter(other.to_string())),
        }
    }
}

/// Parameter collection attached to an MGCP message.
///
/// Keys are unique; putting a parameter twice keeps the latest value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    entries: BTreeMap<MgcpParameterType, String>,
}

impl Parameters {
    /// Create an empty parameter collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter value.
    pub fn put(&mut self, parameter: MgcpParameterType, value: impl Into<String>) {
        self.entries.insert(parameter, value.into());
    }

    /// Set a parameter value, consuming and returning the collection.
    #[must_use]
    pub fn with(mut self, parameter: MgcpParameterType, value: impl Into<String>) -> Self {
        self.put(parameter, value);
        self
    }

    /// Get a parameter value.
    #[must_use]
    pub fn get(&self, parameter: MgcpParameterType) -> Option<&str> {
        self.entries.get(&parameter).map(String::as_str)
    }

    /// Get a parameter value parsed as an unsigned integer.
    ///
    /// Returns `None` when the parameter is absent or not numeric.
    #[must_use]
    pub fn get_integer(&self, parameter: MgcpParameterType) -> Option<u32> {
        self.get(parameter).and_then(|value| value.parse().ok())
    }

    /// Remove a parameter, returning its previous value.
    pub fn remove(&mut self, parameter: MgcpParameterType) -> Option<String> {
        self.entries.remove(&parameter)
    }

    /// Number of parameters present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over parameters in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (MgcpParameterType, &str)> {
        self.entries
            .iter()
            .map(|(parameter, value)| (*parameter, value.as_str()))
    }
}
