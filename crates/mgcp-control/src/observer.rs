//! Message observer registration and fan-out.
//!
//! Observers see every message the transaction layer processes, regardless
//! of verb: the transport layer registers to encode and send outgoing
//! responses, audit components register to log traffic. Registration is
//! identity-based, so registering the same observer twice keeps a single
//! entry.

use mgcp_protocol::message::{MessageDirection, MgcpMessage};
use parking_lot::RwLock;
use std::net::SocketAddr;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{trace, warn};

/// Receiver of every message processed by the transaction layer.
pub trait MgcpMessageObserver: Send + Sync {
    /// Called once per processed message.
    ///
    /// `local_addr` and `remote_addr` are the endpoints of the datagram
    /// exchange; `direction` tells whether the message arrived from the
    /// peer or is about to be sent to it.
    fn on_message(
        &self,
        local_addr: SocketAddr,
        remote_addr: SocketAddr,
        message: &MgcpMessage,
        direction: MessageDirection,
    );
}

/// Deduplicated set of message observers.
///
/// The set is read on every processed message and written only when a
/// component registers or unregisters, so it sits behind a reader-writer
/// lock. Fan-out iterates a snapshot taken under the read lock, which lets
/// observer callbacks re-enter [`observe`](Self::observe) and
/// [`forget`](Self::forget) without deadlocking.
#[derive(Default)]
pub struct MessageObserverRegistry {
    observers: RwLock<Vec<Arc<dyn MgcpMessageObserver>>>,
}

/// Identity comparison on the allocation only. `Arc::ptr_eq` also compares
/// vtable pointers, which are not unique for trait objects.
fn same_observer(a: &Arc<dyn MgcpMessageObserver>, b: &Arc<dyn MgcpMessageObserver>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a).cast::<()>(),
        Arc::as_ptr(b).cast::<()>(),
    )
}

impl MessageObserverRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer.
    ///
    /// Registering an observer that is already present is a no-op; identity
    /// is the allocation the `Arc` points at, not the value behind it.
    pub fn observe(&self, observer: Arc<dyn MgcpMessageObserver>) {
        let mut observers = self.observers.write();
        if observers.iter().any(|existing| same_observer(existing, &observer)) {
            trace!(target: "mgcp.control.observer", "Observer already registered");
            return;
        }
        observers.push(observer);
        trace!(
            target: "mgcp.control.observer",
            observer_count = observers.len(),
            "Observer registered"
        );
    }

    /// Unregister an observer. Unknown observers are ignored.
    pub fn forget(&self, observer: &Arc<dyn MgcpMessageObserver>) {
        let mut observers = self.observers.write();
        observers.retain(|existing| !same_observer(existing, observer));
        trace!(
            target: "mgcp.control.observer",
            observer_count = observers.len(),
            "Observer unregistered"
        );
    }

    /// Number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.read().len()
    }

    /// Whether no observers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.read().is_empty()
    }

    /// Deliver a message to every registered observer exactly once.
    ///
    /// The originator, when given, is skipped so a component pushing a
    /// message does not hear its own echo. A panic inside one observer's
    /// callback is caught and logged; the remaining observers still receive
    /// the message.
    pub fn notify(
        &self,
        originator: Option<&Arc<dyn MgcpMessageObserver>>,
        local_addr: SocketAddr,
        remote_addr: SocketAddr,
        message: &MgcpMessage,
        direction: MessageDirection,
    ) {
        let snapshot: Vec<Arc<dyn MgcpMessageObserver>> = self.observers.read().clone();
        for observer in snapshot {
            if let Some(originator) = originator {
                if same_observer(&observer, originator) {
                    continue;
                }
            }
            let delivery = catch_unwind(AssertUnwindSafe(|| {
                observer.on_message(local_addr, remote_addr, message, direction);
            }));
            if delivery.is_err() {
                warn!(
                    target: "mgcp.control.observer",
                    %message,
                    %direction,
                    "Observer panicked during message delivery, continuing fan-out"
                );
            }
        }
    }
}

impl std::fmt::Debug for MessageObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageObserverRegistry")
            .field("observer_count", &self.len())
            .finish()
    }
}
