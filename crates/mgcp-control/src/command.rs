//! Asynchronous command execution boundary.
//!
//! Verb-specific business logic (connection creation, notification
//! requests, ...) lives outside this crate behind the [`MgcpCommand`]
//! trait. The dispatcher submits accepted commands through a
//! [`CommandExecutor`] and returns to the datagram path immediately;
//! command completion is observed through a callback invoked exactly once.

use crate::errors::MgcpCommandError;
use async_trait::async_trait;
use mgcp_protocol::message::{MgcpResponse, TransactionId};
use mgcp_protocol::params::Parameters;
use tokio::runtime::Handle;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::trace;

/// Outcome of a successfully executed command.
///
/// The completion path translates this into the outgoing [`MgcpResponse`];
/// the dispatcher never inspects it beyond that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MgcpCommandResult {
    /// Transaction the command answered.
    pub transaction_id: TransactionId,
    /// Return code for the response line.
    pub code: u16,
    /// Return text for the response line.
    pub text: String,
    /// Parameter lines to carry on the response.
    pub parameters: Parameters,
}

impl MgcpCommandResult {
    /// Create a result with no parameters.
    #[must_use]
    pub fn new(transaction_id: TransactionId, code: u16, text: impl Into<String>) -> Self {
        Self {
            transaction_id,
            code,
            text: text.into(),
            parameters: Parameters::new(),
        }
    }

    /// Build the response this result describes.
    #[must_use]
    pub fn into_response(self) -> MgcpResponse {
        MgcpResponse {
            transaction_id: self.transaction_id,
            code: self.code,
            text: self.text,
            parameters: self.parameters,
        }
    }
}

/// Verb-specific command logic, supplied by the caller per request.
#[async_trait]
pub trait MgcpCommand: Send + 'static {
    /// Run the command to completion.
    async fn execute(self: Box<Self>) -> Result<MgcpCommandResult, MgcpCommandError>;
}

/// Callback observing command completion.
///
/// Invoked exactly once per submitted command: with the command's result,
/// with the error that prevented one (including a panic inside the
/// command), or with [`MgcpCommandError::Cancelled`] when the submission
/// handle is aborted first.
pub type CommandCompletion =
    Box<dyn FnOnce(Result<MgcpCommandResult, MgcpCommandError>) + Send + 'static>;

/// Boundary over which accepted commands are scheduled.
///
/// Submission never blocks on command execution. Aborting the returned
/// handle cancels the command itself and completes the callback with
/// [`MgcpCommandError::Cancelled`]; the transaction record holds the handle
/// so eviction can stop a hung command.
pub trait CommandExecutor: Send + Sync {
    /// Schedule a command, invoking `on_complete` when it finishes.
    fn submit(&self, command: Box<dyn MgcpCommand>, on_complete: CommandCompletion)
        -> JoinHandle<()>;
}

/// [`CommandExecutor`] running commands as tasks on a tokio runtime.
///
/// The command runs in its own task so a panic inside it surfaces as a
/// [`tokio::task::JoinError`] instead of tearing down the completion path;
/// the wrapping task maps that join failure into [`MgcpCommandError`] and
/// drives the callback. The two tasks share their fate: aborting the
/// returned (wrapping) handle also aborts the command task, so a command
/// whose transaction was evicted stops running instead of finishing
/// unobserved.
#[derive(Debug, Clone)]
pub struct TokioCommandExecutor {
    handle: Handle,
}

impl TokioCommandExecutor {
    /// Create an executor spawning onto the given runtime.
    #[must_use]
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }
}

/// Drives the completion callback exactly once.
///
/// On the normal path [`complete`](Self::complete) hands the callback the
/// command's outcome. If the wrapping task is aborted first, its future is
/// dropped mid-await and the drop path takes over: it aborts the command
/// task and completes the callback with [`MgcpCommandError::Cancelled`].
struct CompletionGuard {
    command: AbortHandle,
    on_complete: Option<CommandCompletion>,
}

impl CompletionGuard {
    fn new(command: AbortHandle, on_complete: CommandCompletion) -> Self {
        Self {
            command,
            on_complete: Some(on_complete),
        }
    }

    fn complete(mut self, result: Result<MgcpCommandResult, MgcpCommandError>) {
        if let Some(on_complete) = self.on_complete.take() {
            on_complete(result);
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.command.abort();
        if let Some(on_complete) = self.on_complete.take() {
            on_complete(Err(MgcpCommandError::Cancelled));
        }
    }
}

impl CommandExecutor for TokioCommandExecutor {
    fn submit(
        &self,
        command: Box<dyn MgcpCommand>,
        on_complete: CommandCompletion,
    ) -> JoinHandle<()> {
        let execution = self.handle.spawn(async move { command.execute().await });
        let guard = CompletionGuard::new(execution.abort_handle(), on_complete);
        self.handle.spawn(async move {
            let result = match execution.await {
                Ok(result) => result,
                Err(join_error) => Err(MgcpCommandError::from_join_error(&join_error)),
            };
            trace!(
                target: "mgcp.control.executor",
                success = result.is_ok(),
                "Command execution finished"
            );
            guard.complete(result);
        })
    }
}
