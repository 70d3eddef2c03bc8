//! Observers that capture or disrupt message fan-out.

use mgcp_control::observer::MgcpMessageObserver;
use mgcp_protocol::message::{MessageDirection, MgcpMessage};
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Notify;

/// One captured observer delivery.
#[derive(Debug, Clone)]
pub struct RecordedMessage {
    pub local_addr: SocketAddr,
    pub remote_addr: SocketAddr,
    pub message: MgcpMessage,
    pub direction: MessageDirection,
}

/// Observer that records every delivery for later assertion.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    deliveries: Mutex<Vec<RecordedMessage>>,
    notify: Notify,
}

impl RecordingObserver {
    /// Create a recording observer, ready to register.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// All deliveries captured so far.
    pub fn deliveries(&self) -> Vec<RecordedMessage> {
        self.deliveries.lock().clone()
    }

    /// Number of deliveries captured so far.
    pub fn delivery_count(&self) -> usize {
        self.deliveries.lock().len()
    }

    /// Wait until at least `count` deliveries have been captured.
    ///
    /// Combine with `tokio::time::timeout` in tests to bound the wait.
    pub async fn wait_for(&self, count: usize) {
        loop {
            if self.delivery_count() >= count {
                return;
            }
            self.notify.notified().await;
        }
    }
}

impl MgcpMessageObserver for RecordingObserver {
    fn on_message(
        &self,
        local_addr: SocketAddr,
        remote_addr: SocketAddr,
        message: &MgcpMessage,
        direction: MessageDirection,
    ) {
        self.deliveries.lock().push(RecordedMessage {
            local_addr,
            remote_addr,
            message: message.clone(),
            direction,
        });
        self.notify.notify_one();
    }
}

/// Observer that panics on every delivery, for fault isolation tests.
#[derive(Debug, Default)]
pub struct PanickingObserver;

impl PanickingObserver {
    /// Create a panicking observer, ready to register.
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

impl MgcpMessageObserver for PanickingObserver {
    fn on_message(
        &self,
        _local_addr: SocketAddr,
        _remote_addr: SocketAddr,
        _message: &MgcpMessage,
        _direction: MessageDirection,
    ) {
        panic!("PanickingObserver scripted panic")
    }
}
