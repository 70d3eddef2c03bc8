//! Executor instrumentation for dispatcher tests.

use mgcp_control::command::{CommandCompletion, CommandExecutor, MgcpCommand, TokioCommandExecutor};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Executor that counts submissions before delegating to a
/// [`TokioCommandExecutor`].
///
/// Lets tests assert that a code path never submitted a command (outgoing
/// requests, rejected duplicates).
#[derive(Debug)]
pub struct CountingExecutor {
    inner: TokioCommandExecutor,
    submissions: Arc<AtomicUsize>,
}

impl CountingExecutor {
    /// Create a counting executor spawning onto the current runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn new() -> Self {
        Self {
            inner: TokioCommandExecutor::new(tokio::runtime::Handle::current()),
            submissions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Counter incremented on every submission.
    pub fn submissions(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.submissions)
    }
}

impl Default for CountingExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor for CountingExecutor {
    fn submit(
        &self,
        command: Box<dyn MgcpCommand>,
        on_complete: CommandCompletion,
    ) -> JoinHandle<()> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        self.inner.submit(command, on_complete)
    }
}
