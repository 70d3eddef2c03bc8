//! MGCP command verbs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Verb of an MGCP request, per RFC 3435 section 2.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MgcpRequestType {
    /// Create Connection
    Crcx,
    /// Modify Connection
    Mdcx,
    /// Delete Connection
    Dlcx,
    /// Notification Request
    Rqnt,
    /// Notify
    Ntfy,
    /// Audit Endpoint
    Auep,
    /// Audit Connection
    Aucx,
    /// Endpoint Configuration
    Epcf,
    /// Restart In Progress
    Rsip,
}

impl MgcpRequestType {
    /// Four-letter verb code as it appears on the command line.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            MgcpRequestType::Crcx => "CRCX",
            MgcpRequestType::Mdcx => "MDCX",
            MgcpRequestType::Dlcx => "DLCX",
            MgcpRequestType::Rqnt => "RQNT",
            MgcpRequestType::Ntfy => "NTFY",
            MgcpRequestType::Auep => "AUEP",
            MgcpRequestType::Aucx => "AUCX",
            MgcpRequestType::Epcf => "EPCF",
            MgcpRequestType::Rsip => "RSIP",
        }
    }
}

impl fmt::Display for MgcpRequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error parsing an MGCP verb.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unrecognized MGCP verb: {0}")]
pub struct UnrecognizedVerb(pub String);

impl FromStr for MgcpRequestType {
    type Err = UnrecognizedVerb;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CRCX" => Ok(MgcpRequestType::Crcx),
            "MDCX" => Ok(MgcpRequestType::Mdcx),
            "DLCX" => Ok(MgcpRequestType::Dlcx),
            "RQNT" => Ok(MgcpRequestType::Rqnt),
            "NTFY" => Ok(MgcpRequestType::Ntfy),
            "AUEP" => Ok(MgcpRequestType::Auep),
            "AUCX" => Ok(MgcpRequestType::Aucx),
            "EPCF" => Ok(MgcpRequestType::Epcf),
            "RSIP" => Ok(MgcpRequestType::Rsip),
            other => Err(UnrecognizedVerb(other.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        let verbs = [
            MgcpRequestType::Crcx,
            MgcpRequestType::Mdcx,
            MgcpRequestType::Dlcx,
            MgcpRequestType::Rqnt,
            MgcpRequestType::Ntfy,
            MgcpRequestType::Auep,
            MgcpRequestType::Aucx,
            MgcpRequestType::Epcf,
            MgcpRequestType::Rsip,
        ];

        for verb in verbs {
            assert_eq!(verb.code().parse::<MgcpRequestType>().unwrap(), verb);
        }
    }

    #[test]
    fn test_rejects_unknown_and_lowercase_verbs() {
        assert!("XXXX".parse::<MgcpRequestType>().is_err());
        assert!("crcx".parse::<MgcpRequestType>().is_err());
        assert_eq!(
            "FOO".parse::<MgcpRequestType>().unwrap_err(),
            UnrecognizedVerb("FOO".to_string())
        );
    }
}
