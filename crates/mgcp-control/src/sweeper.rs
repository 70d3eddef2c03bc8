//! Background expiry sweep.
//!
//! A transaction whose response never arrives would occupy its registry
//! slot forever, so a background task periodically evicts transactions
//! older than the configured maximum age and prunes the sent-response
//! history beyond its retention window. The sweep runs entirely off the
//! datagram path.
//!
//! # Graceful Shutdown
//!
//! The task supports graceful shutdown via a cancellation token. When the
//! token is cancelled, the task completes its current iteration and exits
//! cleanly.

use crate::config::TransactionConfig;
use crate::manager::MgcpTransactionManager;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Start the transaction sweep background task.
///
/// Runs in a loop, evicting expired transactions and pruning the response
/// history at the configured interval. Exits gracefully when the
/// cancellation token is triggered.
#[instrument(skip_all, name = "mgcp.control.sweeper")]
pub async fn start_transaction_sweeper(
    manager: Arc<MgcpTransactionManager>,
    config: TransactionConfig,
    cancel_token: CancellationToken,
) {
    info!(
        target: "mgcp.control.sweeper",
        sweep_interval_seconds = config.sweep_interval_seconds,
        max_age_seconds = config.max_age_seconds,
        history_window_seconds = config.history_window_seconds,
        "Starting transaction sweep task"
    );

    let mut interval = tokio::time::interval(config.sweep_interval());
    // The first tick fires immediately; skip it so a freshly started
    // sweeper does not race transactions opened during startup.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                run_sweep(&manager, &config);
            }
            _ = cancel_token.cancelled() => {
                info!(
                    target: "mgcp.control.sweeper",
                    "Transaction sweep task received shutdown signal, exiting"
                );
                break;
            }
        }
    }

    info!(
        target: "mgcp.control.sweeper",
        "Transaction sweep task stopped"
    );
}

/// Run a single sweep iteration.
///
/// Separated from the main loop to allow direct testing.
pub(crate) fn run_sweep(manager: &MgcpTransactionManager, config: &TransactionConfig) {
    let evicted = manager.evict_expired(config.max_age());
    let pruned = manager.prune_history();
    if evicted > 0 || pruned > 0 {
        debug!(
            target: "mgcp.control.sweeper",
            evicted,
            pruned,
            in_flight = manager.in_flight(),
            "Sweep iteration finished"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::command::TokioCommandExecutor;
    use mgcp_protocol::message::{MessageDirection, MgcpRequest, MgcpResponse, TransactionId};
    use mgcp_protocol::verb::MgcpRequestType;
    use std::net::SocketAddr;
    use std::time::Duration;

    fn manager_with(config: &TransactionConfig) -> Arc<MgcpTransactionManager> {
        let executor = Arc::new(TokioCommandExecutor::new(tokio::runtime::Handle::current()));
        MgcpTransactionManager::new(config.clone(), executor)
    }

    fn addr(port: u16) -> SocketAddr {
        format!("127.0.0.1:{port}").parse().unwrap()
    }

    fn open_transaction(manager: &Arc<MgcpTransactionManager>, id: u32) {
        let mut request = MgcpRequest::new(
            TransactionId::new(id),
            MgcpRequestType::Rqnt,
            "switchboard/ivr/1@127.0.0.1:2427",
        );
        manager
            .process_request(
                addr(2427),
                addr(2727),
                &mut request,
                None,
                MessageDirection::Incoming,
            )
            .expect("Request should register");
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_sweep_evicts_expired_transactions() {
        let config = TransactionConfig::default();
        let manager = manager_with(&config);
        open_transaction(&manager, 1);
        tokio::time::advance(config.max_age() + Duration::from_secs(1)).await;
        open_transaction(&manager, 2);

        run_sweep(&manager, &config);

        assert!(!manager.contains(TransactionId::new(1)));
        assert!(manager.contains(TransactionId::new(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_sweep_prunes_response_history() {
        let config = TransactionConfig::default();
        let manager = manager_with(&config);
        open_transaction(&manager, 7);
        let response = MgcpResponse::new(TransactionId::new(7), 200, "Successful Transaction");
        manager
            .process_response(addr(2427), addr(2727), &response, MessageDirection::Outgoing)
            .expect("Response should close the transaction");
        assert!(manager.last_response(TransactionId::new(7)).is_some());

        tokio::time::advance(config.history_window() + Duration::from_secs(1)).await;
        run_sweep(&manager, &config);

        assert_eq!(manager.last_response(TransactionId::new(7)), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_loop_evicts_on_its_interval() {
        let config = TransactionConfig::default();
        let manager = manager_with(&config);
        open_transaction(&manager, 9);

        let cancel_token = CancellationToken::new();
        let task = tokio::spawn(start_transaction_sweeper(
            Arc::clone(&manager),
            config.clone(),
            cancel_token.clone(),
        ));
        // Let the spawned sweeper run up to its first interval await before
        // advancing the paused clock, so its interval baseline is t=0.
        tokio::task::yield_now().await;

        // Let the clock pass the eviction age plus at least one sweep tick
        tokio::time::advance(config.max_age() + config.sweep_interval() + Duration::from_secs(1))
            .await;
        tokio::task::yield_now().await;

        assert!(!manager.contains(TransactionId::new(9)));

        cancel_token.cancel();
        tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .expect("Sweeper should stop after cancellation")
            .expect("Sweeper task should not panic");
    }

    #[tokio::test]
    async fn test_sweeper_stops_on_cancellation() {
        let config = TransactionConfig::default();
        let manager = manager_with(&config);
        let cancel_token = CancellationToken::new();

        let task = tokio::spawn(start_transaction_sweeper(
            Arc::clone(&manager),
            config,
            cancel_token.clone(),
        ));
        tokio::time::sleep(Duration::from_millis(50)).await;

        cancel_token.cancel();

        let result = tokio::time::timeout(Duration::from_secs(2), task).await;
        assert!(
            result.is_ok(),
            "Sweeper should stop within 2 seconds after cancellation"
        );
        result.unwrap().expect("Sweeper task should not panic");
    }
}
