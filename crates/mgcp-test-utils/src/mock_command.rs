//! Scriptable MGCP command for executor and dispatcher tests.

use async_trait::async_trait;
use mgcp_control::command::{MgcpCommand, MgcpCommandResult};
use mgcp_control::errors::MgcpCommandError;
use mgcp_protocol::message::TransactionId;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Debug, Clone)]
enum MockBehavior {
    Succeed { code: u16, text: String },
    Fail(String),
    Panic,
}

/// A command whose outcome is scripted by the test.
///
/// Defaults to answering `200 Successful Transaction`. Clone the counters
/// ([`executions`](Self::executions) and [`completed`](Self::completed))
/// before handing the command to the dispatcher:
///
/// ```rust,ignore
/// let command = MockCommand::new(TransactionId::new(147_483_653));
/// let executions = command.executions();
/// let completed = command.completed();
///
/// manager.process_request(remote, local, &mut request,
///     Some(Box::new(command)), MessageDirection::Incoming)?;
///
/// completed.notified().await;
/// assert_eq!(executions.load(Ordering::SeqCst), 1);
/// ```
#[derive(Debug)]
pub struct MockCommand {
    transaction_id: TransactionId,
    behavior: MockBehavior,
    delay: Option<Duration>,
    executions: Arc<AtomicUsize>,
    completed: Arc<Notify>,
}

impl MockCommand {
    /// A command answering `200 Successful Transaction`.
    pub fn new(transaction_id: TransactionId) -> Self {
        Self {
            transaction_id,
            behavior: MockBehavior::Succeed {
                code: 200,
                text: "Successful Transaction".to_string(),
            },
            delay: None,
            executions: Arc::new(AtomicUsize::new(0)),
            completed: Arc::new(Notify::new()),
        }
    }

    /// Answer with the given code and text instead of `200`.
    pub fn with_result(mut self, code: u16, text: impl Into<String>) -> Self {
        self.behavior = MockBehavior::Succeed {
            code,
            text: text.into(),
        };
        self
    }

    /// Fail execution with the given message.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.behavior = MockBehavior::Fail(message.into());
        self
    }

    /// Panic during execution.
    pub fn with_panic(mut self) -> Self {
        self.behavior = MockBehavior::Panic;
        self
    }

    /// Sleep before producing the outcome.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Counter incremented each time the command body runs.
    pub fn executions(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.executions)
    }

    /// Notified when the command body has finished.
    pub fn completed(&self) -> Arc<Notify> {
        Arc::clone(&self.completed)
    }
}

#[async_trait]
impl MgcpCommand for MockCommand {
    async fn execute(self: Box<Self>) -> Result<MgcpCommandResult, MgcpCommandError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.executions.fetch_add(1, Ordering::SeqCst);
        let outcome = match self.behavior {
            MockBehavior::Succeed { code, text } => {
                Ok(MgcpCommandResult::new(self.transaction_id, code, text))
            }
            MockBehavior::Fail(message) => Err(MgcpCommandError::Execution(message)),
            MockBehavior::Panic => {
                self.completed.notify_one();
                panic!("MockCommand scripted panic")
            }
        };
        self.completed.notify_one();
        outcome
    }
}
