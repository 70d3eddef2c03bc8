//! # MGCP Test Utilities
//!
//! Shared test utilities for the Switchboard MGCP control stack.
//!
//! This crate provides mock implementations and test fixtures for testing
//! the transaction layer without a real transport or command layer.
//!
//! ## Modules
//!
//! - `mock_command` - Scriptable command (success, failure, panic, delay)
//! - `recording_observer` - Observers that capture or disrupt fan-out
//! - `executor` - Executor instrumentation (submission counting)
//! - `fixtures` - Pre-configured messages and addresses
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mgcp_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() {
//!     let manager = MgcpTransactionManager::new(
//!         TransactionConfig::default(),
//!         Arc::new(CountingExecutor::new()),
//!     );
//!
//!     let observer = RecordingObserver::new();
//!     manager.observe(observer.clone());
//!
//!     let mut request = crcx_request();
//!     let command = MockCommand::new(request.transaction_id);
//!
//!     // Run your test...
//! }
//! ```

pub mod executor;
pub mod fixtures;
pub mod mock_command;
pub mod recording_observer;

/// Initialize tracing for a test binary.
///
/// Respects `RUST_LOG`, writes through the test capture writer, and is safe
/// to call from every test; only the first call installs a subscriber.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub use executor::CountingExecutor;
pub use fixtures::{
    call_agent_addr, crcx_request, gateway_addr, request, success_response, unassigned_request,
    BRIDGE_ENDPOINT, REFERENCE_TRANSACTION_ID,
};
pub use mock_command::MockCommand;
pub use recording_observer::{PanickingObserver, RecordedMessage, RecordingObserver};
