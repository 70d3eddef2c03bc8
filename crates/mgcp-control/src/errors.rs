//! Transaction correlation error types.
//!
//! Transaction errors identify the offending transaction so the composing
//! layer can decide how to answer the peer; command errors cover executions
//! that produced no result at all.

use mgcp_protocol::message::TransactionId;
use thiserror::Error;
use tokio::task::JoinError;

/// Errors surfaced by transaction correlation.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// An incoming request carried the identifier of a transaction that is
    /// still in flight (retransmission or protocol violation).
    #[error("Transaction {0} already exists")]
    DuplicateTransaction(TransactionId),

    /// A response referenced an identifier with no registered transaction.
    #[error("Could not find transaction {0}")]
    TransactionNotFound(TransactionId),
}

impl TransactionError {
    /// Identifier of the offending transaction.
    #[must_use]
    pub const fn transaction_id(&self) -> TransactionId {
        match self {
            TransactionError::DuplicateTransaction(id)
            | TransactionError::TransactionNotFound(id) => *id,
        }
    }
}

/// Failure of asynchronous command execution.
///
/// Commands report business-level failures through the return code of their
/// result; this error covers executions that never produced one. The
/// completion path answers any of these with a `510 Protocol Error`
/// response.
#[derive(Debug, Error)]
pub enum MgcpCommandError {
    /// The command reported a failure without producing a result.
    #[error("Command execution failed: {0}")]
    Execution(String),

    /// The command task panicked.
    #[error("Command task panicked")]
    Panicked,

    /// The command task was cancelled before completing.
    #[error("Command task was cancelled")]
    Cancelled,
}

impl MgcpCommandError {
    /// Map a task join failure to the command error it represents.
    #[must_use]
    pub fn from_join_error(error: &JoinError) -> Self {
        if error.is_panic() {
            MgcpCommandError::Panicked
        } else {
            MgcpCommandError::Cancelled
        }
    }
}
