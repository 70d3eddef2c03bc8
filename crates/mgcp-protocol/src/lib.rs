//! MGCP message model shared across Switchboard components.
//!
//! This crate holds the value types the MGCP control stack exchanges:
//! requests, responses, transaction identifiers, parameter lines and the
//! RFC 3435 verb and return code catalogs. Wire-level parsing and encoding
//! belong to the transport layer, not here.

#![warn(clippy::pedantic)]

/// Module for request and response messages
pub mod message;

/// Module for parameter lines
pub mod params;

/// Module for the return code catalog
pub mod response_code;

/// Module for command verbs
pub mod verb;
