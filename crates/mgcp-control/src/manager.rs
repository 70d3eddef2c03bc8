//! Transaction correlation and dispatch.
//!
//! [`MgcpTransactionManager`] is the single entry point the transport and
//! command layers drive. It owns the registry of in-flight transactions,
//! the local identifier numberspace, the observer set and the sent-response
//! history, and composes them into the process/notify protocol:
//!
//! - an incoming request is registered atomically (a duplicate while the
//!   original is in flight is rejected) and its command is submitted to the
//!   executor without blocking the datagram path
//! - an outgoing request is assigned a local identifier when it carries
//!   none, then registered to await the peer's answer
//! - a response in either direction closes its transaction; an outgoing
//!   response additionally fans out to the observers and is retained for
//!   retransmission replay
//!
//! One manager instance serves one call agent peering; all methods are safe
//! to call from any thread.

use crate::command::{CommandExecutor, MgcpCommand};
use crate::config::TransactionConfig;
use crate::errors::TransactionError;
use crate::history::ResponseHistory;
use crate::numberspace::TransactionNumberspace;
use crate::observer::{MessageObserverRegistry, MgcpMessageObserver};
use crate::transaction::MgcpTransaction;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use mgcp_protocol::message::{
    MessageDirection, MgcpMessage, MgcpRequest, MgcpResponse, TransactionId,
};
use mgcp_protocol::response_code::MgcpResponseCode;
use std::net::SocketAddr;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Correlates MGCP requests with their responses.
///
/// See the [module documentation](self) for the protocol. Construct once
/// per peering and share the returned [`Arc`] with the transport and
/// command layers.
pub struct MgcpTransactionManager {
    transactions: DashMap<TransactionId, MgcpTransaction>,
    numberspace: TransactionNumberspace,
    observers: MessageObserverRegistry,
    history: ResponseHistory,
    executor: Arc<dyn CommandExecutor>,
    config: TransactionConfig,
    // Handed to command completion callbacks; Weak so an abandoned manager
    // can drop even while commands are still running.
    self_ref: Weak<MgcpTransactionManager>,
}

impl MgcpTransactionManager {
    /// Create a manager with the given configuration and executor.
    #[must_use]
    pub fn new(config: TransactionConfig, executor: Arc<dyn CommandExecutor>) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            transactions: DashMap::new(),
            numberspace: TransactionNumberspace::from_config(&config),
            observers: MessageObserverRegistry::new(),
            history: ResponseHistory::new(),
            executor,
            config,
            self_ref: self_ref.clone(),
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &TransactionConfig {
        &self.config
    }

    /// Process a request datagram.
    ///
    /// An incoming request is registered and its command, when given, is
    /// submitted for asynchronous execution; the call returns as soon as
    /// submission succeeds. An outgoing request carrying the unassigned
    /// identifier 0 first receives a locally-generated one, written into
    /// `request` in place, then is registered to await the peer's answer;
    /// a command supplied alongside an outgoing request is discarded with a
    /// warning, as the peer executes it.
    ///
    /// # Errors
    ///
    /// [`TransactionError::DuplicateTransaction`] when the request's
    /// identifier already has a transaction in flight. The sent-response
    /// history ([`last_response`](Self::last_response)) may hold a
    /// replayable answer for a retransmission whose original already
    /// closed.
    pub fn process_request(
        &self,
        remote_addr: SocketAddr,
        local_addr: SocketAddr,
        request: &mut MgcpRequest,
        command: Option<Box<dyn MgcpCommand>>,
        direction: MessageDirection,
    ) -> Result<(), TransactionError> {
        if direction == MessageDirection::Outgoing && request.transaction_id.is_unassigned() {
            request.transaction_id = self.numberspace.generate_id();
        }
        let id = request.transaction_id;

        // Duplicate check and registration are one atomic operation; two
        // threads processing the same retransmitted datagram cannot both
        // observe an empty slot.
        match self.transactions.entry(id) {
            Entry::Occupied(_) => {
                warn!(
                    target: "mgcp.control.transaction",
                    transaction_id = %id,
                    request = %request,
                    %direction,
                    "Rejected request for transaction already in flight"
                );
                Err(TransactionError::DuplicateTransaction(id))
            }
            Entry::Vacant(slot) => {
                let mut transaction = MgcpTransaction::new(id, request.clone());
                match (direction, command) {
                    (MessageDirection::Incoming, Some(command)) => {
                        let task = self.submit_command(remote_addr, local_addr, id, command);
                        transaction.set_command_task(task);
                    }
                    (MessageDirection::Outgoing, Some(_)) => {
                        warn!(
                            target: "mgcp.control.transaction",
                            transaction_id = %id,
                            request = %request,
                            "Discarding command supplied with an outgoing request; the peer executes it"
                        );
                    }
                    _ => {}
                }
                slot.insert(transaction);
                debug!(
                    target: "mgcp.control.transaction",
                    transaction_id = %id,
                    request = %request,
                    %direction,
                    "Opened transaction"
                );
                Ok(())
            }
        }
    }

    /// Process a response datagram, closing its transaction.
    ///
    /// The transaction record is removed atomically. An outgoing response
    /// (answering a request this node received) additionally fans out to
    /// every registered observer and is retained in the sent-response
    /// history; an incoming response closes the transaction silently.
    ///
    /// # Errors
    ///
    /// [`TransactionError::TransactionNotFound`] when no transaction is in
    /// flight for the response's identifier: a stale or duplicate response,
    /// a very late one arriving after eviction, or a peer protocol error.
    pub fn process_response(
        &self,
        remote_addr: SocketAddr,
        local_addr: SocketAddr,
        response: &MgcpResponse,
        direction: MessageDirection,
    ) -> Result<(), TransactionError> {
        let id = response.transaction_id;
        let Some((_, mut transaction)) = self.transactions.remove(&id) else {
            warn!(
                target: "mgcp.control.transaction",
                transaction_id = %id,
                response = %response,
                %direction,
                "Response for unknown transaction"
            );
            return Err(TransactionError::TransactionNotFound(id));
        };
        transaction.close();
        debug!(
            target: "mgcp.control.transaction",
            transaction_id = %id,
            response = %response,
            %direction,
            "Closed transaction"
        );

        if direction == MessageDirection::Outgoing {
            self.history.record(response.clone());
            self.notify(
                None,
                local_addr,
                remote_addr,
                &MgcpMessage::Response(response.clone()),
                direction,
            );
        }
        Ok(())
    }

    /// Register a message observer. Double registration is a no-op.
    pub fn observe(&self, observer: Arc<dyn MgcpMessageObserver>) {
        self.observers.observe(observer);
    }

    /// Unregister a message observer. Unknown observers are ignored.
    pub fn forget(&self, observer: &Arc<dyn MgcpMessageObserver>) {
        self.observers.forget(observer);
    }

    /// Deliver a message to every registered observer except the
    /// originator.
    ///
    /// Callable independently of processing; command completion uses this
    /// to push freshly computed responses toward the transport layer.
    pub fn notify(
        &self,
        originator: Option<&Arc<dyn MgcpMessageObserver>>,
        local_addr: SocketAddr,
        remote_addr: SocketAddr,
        message: &MgcpMessage,
        direction: MessageDirection,
    ) {
        self.observers
            .notify(originator, local_addr, remote_addr, message, direction);
    }

    /// Whether a transaction is currently in flight for `id`.
    #[must_use]
    pub fn contains(&self, id: TransactionId) -> bool {
        self.transactions.contains_key(&id)
    }

    /// Number of transactions currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.transactions.len()
    }

    /// The response last sent for a transaction, if still retained.
    ///
    /// Lets the composing layer replay the answer to a retransmitted
    /// request instead of executing its command again.
    #[must_use]
    pub fn last_response(&self, id: TransactionId) -> Option<MgcpResponse> {
        self.history.last_response(id)
    }

    /// Evict transactions open longer than `max_age`. Returns how many were
    /// evicted.
    ///
    /// Runs off the critical path, driven by the background sweep. An
    /// evicted transaction's command task, if still running, is aborted.
    pub fn evict_expired(&self, max_age: Duration) -> usize {
        let now = Instant::now();
        let expired: Vec<TransactionId> = self
            .transactions
            .iter()
            .filter(|entry| entry.value().age(now) > max_age)
            .map(|entry| *entry.key())
            .collect();

        let mut evicted = 0;
        for id in expired {
            // Re-checked under the shard lock; the response may have
            // arrived between the scan and this removal.
            if let Some((_, mut transaction)) =
                self.transactions.remove_if(&id, |_, t| t.age(now) > max_age)
            {
                let age = transaction.age(now);
                transaction.close();
                warn!(
                    target: "mgcp.control.sweeper",
                    transaction_id = %id,
                    age_seconds = age.as_secs(),
                    "Evicted transaction whose response never arrived"
                );
                evicted += 1;
            }
        }
        evicted
    }

    /// Drop sent responses older than the configured retention window.
    /// Returns how many were dropped.
    pub fn prune_history(&self) -> usize {
        self.history.prune(self.config.history_window())
    }

    fn submit_command(
        &self,
        remote_addr: SocketAddr,
        local_addr: SocketAddr,
        id: TransactionId,
        command: Box<dyn MgcpCommand>,
    ) -> tokio::task::JoinHandle<()> {
        let manager = self.self_ref.clone();
        self.executor.submit(
            command,
            Box::new(move |result| {
                complete_command(&manager, remote_addr, local_addr, id, result);
            }),
        )
    }
}

impl std::fmt::Debug for MgcpTransactionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MgcpTransactionManager")
            .field("in_flight", &self.in_flight())
            .field("observers", &self.observers)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Turn a command completion into the outgoing response and push it toward
/// the transport layer.
///
/// A failed or panicked command is answered with `510 Protocol Error`, as
/// the peer must still receive something for the transaction it opened.
/// The transaction slot stays occupied until the composing layer feeds the
/// response back through [`MgcpTransactionManager::process_response`].
fn complete_command(
    manager: &Weak<MgcpTransactionManager>,
    remote_addr: SocketAddr,
    local_addr: SocketAddr,
    id: TransactionId,
    result: Result<crate::command::MgcpCommandResult, crate::errors::MgcpCommandError>,
) {
    let Some(manager) = manager.upgrade() else {
        // Manager dropped while the command was running; nowhere to deliver
        return;
    };
    let response = match result {
        Ok(result) => result.into_response(),
        Err(crate::errors::MgcpCommandError::Cancelled) => {
            // The transaction was evicted and its command aborted; the slot
            // is gone, so there is no answer left to push.
            debug!(
                target: "mgcp.control.executor",
                transaction_id = %id,
                "Command cancelled before completing, nothing to deliver"
            );
            return;
        }
        Err(error) => {
            warn!(
                target: "mgcp.control.executor",
                transaction_id = %id,
                error = %error,
                "Command failed, answering with protocol error"
            );
            MgcpResponse::from_code(id, MgcpResponseCode::ProtocolError)
        }
    };
    manager.notify(
        None,
        local_addr,
        remote_addr,
        &MgcpMessage::Response(response),
        MessageDirection::Outgoing,
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::command::{MgcpCommandResult, TokioCommandExecutor};
    use crate::errors::MgcpCommandError;
    use async_trait::async_trait;
    use mgcp_protocol::verb::MgcpRequestType;

    struct SucceedingCommand {
        id: TransactionId,
    }

    #[async_trait]
    impl MgcpCommand for SucceedingCommand {
        async fn execute(self: Box<Self>) -> Result<MgcpCommandResult, MgcpCommandError> {
            Ok(MgcpCommandResult::new(self.id, 200, "Successful Transaction"))
        }
    }

    fn manager() -> Arc<MgcpTransactionManager> {
        let executor = Arc::new(TokioCommandExecutor::new(tokio::runtime::Handle::current()));
        MgcpTransactionManager::new(TransactionConfig::default(), executor)
    }

    fn addr(port: u16) -> SocketAddr {
        format!("127.0.0.1:{port}").parse().unwrap()
    }

    fn crcx(id: u32) -> MgcpRequest {
        MgcpRequest::new(
            TransactionId::new(id),
            MgcpRequestType::Crcx,
            "switchboard/bridge/$@127.0.0.1:2427",
        )
    }

    #[tokio::test]
    async fn test_incoming_request_registers_transaction() {
        let manager = manager();
        let mut request = crcx(147_483_653);

        manager
            .process_request(
                addr(2427),
                addr(2727),
                &mut request,
                Some(Box::new(SucceedingCommand {
                    id: TransactionId::new(147_483_653),
                })),
                MessageDirection::Incoming,
            )
            .expect("First sighting should register");

        assert!(manager.contains(TransactionId::new(147_483_653)));
        assert_eq!(manager.in_flight(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_incoming_request_is_rejected() {
        let manager = manager();
        let mut request = crcx(147_483_653);

        manager
            .process_request(
                addr(2427),
                addr(2727),
                &mut request,
                None,
                MessageDirection::Incoming,
            )
            .expect("First sighting should register");
        let duplicate = manager.process_request(
            addr(2427),
            addr(2727),
            &mut request.clone(),
            None,
            MessageDirection::Incoming,
        );

        assert!(matches!(
            duplicate,
            Err(TransactionError::DuplicateTransaction(id))
                if id == TransactionId::new(147_483_653)
        ));
        assert!(manager.contains(TransactionId::new(147_483_653)));
    }

    #[tokio::test]
    async fn test_outgoing_request_receives_generated_id() {
        let manager = manager();
        let mut request = crcx(0);

        manager
            .process_request(
                addr(2427),
                addr(2727),
                &mut request,
                None,
                MessageDirection::Outgoing,
            )
            .expect("Outgoing request should register");

        assert!(!request.transaction_id.is_unassigned());
        assert!(manager.contains(request.transaction_id));
    }

    #[tokio::test]
    async fn test_outgoing_request_with_assigned_id_keeps_it() {
        let manager = manager();
        let mut request = crcx(42);

        manager
            .process_request(
                addr(2427),
                addr(2727),
                &mut request,
                None,
                MessageDirection::Outgoing,
            )
            .expect("Outgoing request should register");

        assert_eq!(request.transaction_id, TransactionId::new(42));
        assert!(manager.contains(TransactionId::new(42)));
    }

    #[tokio::test]
    async fn test_response_for_unknown_transaction_is_rejected() {
        let manager = manager();
        let response = MgcpResponse::new(TransactionId::new(147_483_653), 200, "Successful Transaction");

        let outcome = manager.process_response(
            addr(2427),
            addr(2727),
            &response,
            MessageDirection::Incoming,
        );

        assert!(matches!(
            outcome,
            Err(TransactionError::TransactionNotFound(id))
                if id == TransactionId::new(147_483_653)
        ));
    }

    #[tokio::test]
    async fn test_outgoing_response_closes_and_records_history() {
        let manager = manager();
        let mut request = crcx(147_483_653);
        manager
            .process_request(
                addr(2427),
                addr(2727),
                &mut request,
                None,
                MessageDirection::Incoming,
            )
            .expect("Request should register");
        let response = MgcpResponse::new(TransactionId::new(147_483_653), 200, "Successful Transaction");

        manager
            .process_response(addr(2427), addr(2727), &response, MessageDirection::Outgoing)
            .expect("Response should close the transaction");

        assert!(!manager.contains(TransactionId::new(147_483_653)));
        assert_eq!(
            manager.last_response(TransactionId::new(147_483_653)),
            Some(response)
        );
    }

    #[tokio::test]
    async fn test_incoming_response_closes_without_history() {
        let manager = manager();
        let mut request = crcx(0);
        manager
            .process_request(
                addr(2427),
                addr(2727),
                &mut request,
                None,
                MessageDirection::Outgoing,
            )
            .expect("Outgoing request should register");
        let id = request.transaction_id;
        let response = MgcpResponse::new(id, 200, "Successful Transaction");

        manager
            .process_response(addr(2427), addr(2727), &response, MessageDirection::Incoming)
            .expect("Response should close the transaction");

        assert!(!manager.contains(id));
        assert_eq!(manager.last_response(id), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_expired_removes_only_old_transactions() {
        let manager = manager();
        let mut old = crcx(1);
        manager
            .process_request(addr(2427), addr(2727), &mut old, None, MessageDirection::Incoming)
            .expect("Request should register");
        tokio::time::advance(Duration::from_secs(20)).await;
        let mut young = crcx(2);
        manager
            .process_request(addr(2427), addr(2727), &mut young, None, MessageDirection::Incoming)
            .expect("Request should register");
        tokio::time::advance(Duration::from_secs(15)).await;

        // Transaction 1 is 35s old, transaction 2 is 15s old
        let evicted = manager.evict_expired(Duration::from_secs(30));

        assert_eq!(evicted, 1);
        assert!(!manager.contains(TransactionId::new(1)));
        assert!(manager.contains(TransactionId::new(2)));
    }
}
