//! MGCP Transaction Correlation Layer
//!
//! This library correlates MGCP requests with their responses across the
//! unreliable datagram transport sitting below it:
//!
//! - Atomic transaction registration rejects retransmitted requests while
//!   the original is still in flight
//! - Locally-originated requests receive identifiers from a dedicated
//!   numberspace, structurally disjoint from the call agent's range
//! - Accepted commands run on an asynchronous executor; their completion
//!   produces the outgoing response without blocking the datagram path
//! - Every processed message fans out to registered observers exactly once,
//!   with panicking observers isolated from the rest
//! - A background sweep evicts transactions whose response never arrived
//!   and prunes the sent-response history used to answer late
//!   retransmissions
//!
//! # Architecture
//!
//! ```text
//! MgcpTransactionManager (one per call agent peering)
//! ├── TransactionNumberspace (local id allocation)
//! ├── transaction registry (in-flight request/response cycles)
//! ├── MessageObserverRegistry (transport, endpoints, ...)
//! ├── CommandExecutor (verb logic scheduled off the datagram path)
//! └── ResponseHistory (sent responses retained for T-HIST seconds)
//! ```
//!
//! The transport and endpoint layers register as observers and feed
//! messages in; verb-specific command logic is supplied per request and
//! never inspected here.

#![warn(clippy::pedantic)]

/// Module for the asynchronous command execution boundary
pub mod command;

/// Module for configuration from environment
pub mod config;

/// Module for transaction correlation error types
pub mod errors;

/// Module for sent-response retention
pub mod history;

/// Module for transaction correlation and dispatch
pub mod manager;

/// Module for local transaction identifier allocation
pub mod numberspace;

/// Module for message observer registration and fan-out
pub mod observer;

/// Module for the background expiry sweep
pub mod sweeper;

/// Module for transaction records
pub mod transaction;
