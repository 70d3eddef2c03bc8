//! Sent-response retention.
//!
//! RFC 3435 section 3.5.4 directs an MGCP entity to remember the responses
//! it sent over the last T-HIST seconds so a retransmitted request can be
//! answered by repeating the response instead of executing its command a
//! second time. The transaction layer records every outgoing response here
//! as its transaction closes; the composing layer consults
//! [`last_response`](ResponseHistory::last_response) when it sees a
//! duplicate and decides whether to replay.

use dashmap::DashMap;
use mgcp_protocol::message::{MgcpResponse, TransactionId};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug)]
struct SentResponse {
    response: MgcpResponse,
    sent_at: Instant,
}

/// Responses sent within the retention window, keyed by transaction id.
#[derive(Debug, Default)]
pub struct ResponseHistory {
    entries: DashMap<TransactionId, SentResponse>,
}

impl ResponseHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a response as sent now.
    ///
    /// A second response for the same transaction id replaces the first;
    /// only the latest answer is worth replaying.
    pub fn record(&self, response: MgcpResponse) {
        self.entries.insert(
            response.transaction_id,
            SentResponse {
                response,
                sent_at: Instant::now(),
            },
        );
    }

    /// The response last sent for a transaction, if still retained.
    #[must_use]
    pub fn last_response(&self, id: TransactionId) -> Option<MgcpResponse> {
        self.entries.get(&id).map(|entry| entry.response.clone())
    }

    /// Drop entries sent longer than `window` ago. Returns how many were
    /// dropped.
    pub fn prune(&self, window: Duration) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.sent_at) <= window);
        // Concurrent records may land mid-retain; never report negative
        before.saturating_sub(self.entries.len())
    }

    /// Number of retained responses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn response(id: u32) -> MgcpResponse {
        MgcpResponse::new(TransactionId::new(id), 200, "Successful Transaction")
    }

    #[test]
    fn test_record_and_lookup() {
        let history = ResponseHistory::new();
        history.record(response(147_483_653));

        let retained = history.last_response(TransactionId::new(147_483_653));

        assert_eq!(retained, Some(response(147_483_653)));
        assert_eq!(history.last_response(TransactionId::new(1)), None);
    }

    #[test]
    fn test_record_keeps_latest_response() {
        let history = ResponseHistory::new();
        history.record(response(5));
        history.record(MgcpResponse::new(TransactionId::new(5), 250, "Connection was deleted"));

        let retained = history.last_response(TransactionId::new(5)).unwrap();

        assert_eq!(retained.code, 250);
        assert_eq!(history.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_prune_drops_only_expired_entries() {
        let history = ResponseHistory::new();
        history.record(response(1));
        tokio::time::advance(Duration::from_secs(20)).await;
        history.record(response(2));
        tokio::time::advance(Duration::from_secs(15)).await;

        // Entry 1 is now 35s old, entry 2 is 15s old
        let dropped = history.prune(Duration::from_secs(30));

        assert_eq!(dropped, 1);
        assert_eq!(history.last_response(TransactionId::new(1)), None);
        assert!(history.last_response(TransactionId::new(2)).is_some());
    }

    #[test]
    fn test_prune_empty_history_is_noop() {
        let history = ResponseHistory::new();

        assert_eq!(history.prune(Duration::from_secs(30)), 0);
        assert!(history.is_empty());
    }
}
