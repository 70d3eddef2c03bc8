//! Transaction layer configuration.
//!
//! Configuration is loaded from environment variables. Every variable has a
//! default, so an empty environment yields a working configuration.

use mgcp_protocol::message::TransactionId;
use std::collections::HashMap;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default floor of the locally-generated transaction id range.
///
/// RFC 3435 section 3.2.1.2 confines call agent transaction ids to
/// 1..=999,999,999. Starting the local range right above it makes a
/// collision with a compliant peer structurally impossible.
pub const DEFAULT_ID_FLOOR: u32 = 1_000_000_000;

/// Default ceiling of the locally-generated transaction id range (2^31 - 1).
pub const DEFAULT_ID_CEILING: u32 = 2_147_483_647;

/// Default maximum age of an open transaction before eviction, in seconds.
pub const DEFAULT_MAX_AGE_SECONDS: u64 = 30;

/// Default sweep interval in seconds.
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 5;

/// Default retention window for sent responses (T-HIST), in seconds.
pub const DEFAULT_HISTORY_WINDOW_SECONDS: u64 = 30;

/// Transaction layer configuration.
///
/// Loaded from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct TransactionConfig {
    /// Lowest identifier the local numberspace hands out (default: 1,000,000,000).
    pub id_floor: u32,

    /// Highest identifier the local numberspace hands out (default: 2^31 - 1).
    pub id_ceiling: u32,

    /// Maximum age of an open transaction before the sweep evicts it
    /// (default: 30).
    pub max_age_seconds: u64,

    /// Interval between sweep iterations (default: 5).
    pub sweep_interval_seconds: u64,

    /// How long sent responses are retained for retransmission replay
    /// (default: 30).
    pub history_window_seconds: u64,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            id_floor: DEFAULT_ID_FLOOR,
            id_ceiling: DEFAULT_ID_CEILING,
            max_age_seconds: DEFAULT_MAX_AGE_SECONDS,
            sweep_interval_seconds: DEFAULT_SWEEP_INTERVAL_SECONDS,
            history_window_seconds: DEFAULT_HISTORY_WINDOW_SECONDS,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl TransactionConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `MGCP_TRANSACTION_ID_FLOOR` - Local id range floor (default: 1000000000)
    /// - `MGCP_TRANSACTION_ID_CEILING` - Local id range ceiling (default: 2147483647)
    /// - `MGCP_TRANSACTION_MAX_AGE_SECONDS` - Eviction age (default: 30)
    /// - `MGCP_SWEEP_INTERVAL_SECONDS` - Sweep interval (default: 5)
    /// - `MGCP_RESPONSE_HISTORY_SECONDS` - Response retention (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let id_floor = vars
            .get("MGCP_TRANSACTION_ID_FLOOR")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_ID_FLOOR);

        let id_ceiling = vars
            .get("MGCP_TRANSACTION_ID_CEILING")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_ID_CEILING);

        let max_age_seconds = vars
            .get("MGCP_TRANSACTION_MAX_AGE_SECONDS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_AGE_SECONDS);

        let sweep_interval_seconds = vars
            .get("MGCP_SWEEP_INTERVAL_SECONDS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECONDS);

        let history_window_seconds = vars
            .get("MGCP_RESPONSE_HISTORY_SECONDS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_HISTORY_WINDOW_SECONDS);

        let config = Self {
            id_floor,
            id_ceiling,
            max_age_seconds,
            sweep_interval_seconds,
            history_window_seconds,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.id_floor == 0 {
            return Err(ConfigError::InvalidValue(
                "transaction id floor must not be 0".to_string(),
            ));
        }
        if self.id_ceiling > TransactionId::MAX.value() {
            return Err(ConfigError::InvalidValue(format!(
                "transaction id ceiling {} exceeds protocol maximum {}",
                self.id_ceiling,
                TransactionId::MAX
            )));
        }
        if self.id_floor > self.id_ceiling {
            return Err(ConfigError::InvalidValue(format!(
                "transaction id floor {} exceeds ceiling {}",
                self.id_floor, self.id_ceiling
            )));
        }
        if self.sweep_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue(
                "sweep interval must not be 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Eviction age as a [`Duration`].
    #[must_use]
    pub const fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_seconds)
    }

    /// Sweep interval as a [`Duration`].
    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }

    /// Response retention window as a [`Duration`].
    #[must_use]
    pub const fn history_window(&self) -> Duration {
        Duration::from_secs(self.history_window_seconds)
    }
}
