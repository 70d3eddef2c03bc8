//! Transaction records.
//!
//! A record tracks one request/response cycle. The registry creates it on
//! first sight of a transaction identifier and drops it once the matching
//! response has been processed; no other component holds on to it.

use mgcp_protocol::message::{MgcpRequest, TransactionId};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Lifecycle state of a transaction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// Awaiting the matching response.
    Open,
    /// The matching response was processed; the record is about to be
    /// dropped.
    Closed,
}

/// One in-flight request/response cycle.
#[derive(Debug)]
pub struct MgcpTransaction {
    id: TransactionId,
    request: MgcpRequest,
    command_task: Option<JoinHandle<()>>,
    state: TransactionState,
    opened_at: Instant,
}

impl MgcpTransaction {
    /// Open a transaction for a request seen for the first time.
    #[must_use]
    pub fn new(id: TransactionId, request: MgcpRequest) -> Self {
        Self {
            id,
            request,
            command_task: None,
            state: TransactionState::Open,
            opened_at: Instant::now(),
        }
    }

    /// Attach the handle of the command execution task.
    pub fn set_command_task(&mut self, task: JoinHandle<()>) {
        self.command_task = Some(task);
    }

    /// Transaction identifier.
    #[must_use]
    pub const fn id(&self) -> TransactionId {
        self.id
    }

    /// The request that opened this transaction.
    #[must_use]
    pub const fn request(&self) -> &MgcpRequest {
        &self.request
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TransactionState {
        self.state
    }

    /// Whether a command execution task is attached.
    #[must_use]
    pub const fn has_command(&self) -> bool {
        self.command_task.is_some()
    }

    /// Time elapsed since the transaction was opened, measured at `now`.
    #[must_use]
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.opened_at)
    }

    /// Close the transaction.
    ///
    /// A command task still running at this point has lost its transaction
    /// (the slot closed without it, typically through eviction) and is
    /// aborted so it cannot linger unobserved.
    pub fn close(&mut self) {
        self.state = TransactionState::Closed;
        if let Some(task) = self.command_task.take() {
            if !task.is_finished() {
                task.abort();
            }
        }
    }
}
