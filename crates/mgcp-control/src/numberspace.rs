//! Local transaction identifier allocation.
//!
//! Locally-originated requests draw their identifiers from a dedicated
//! numberspace. The default range sits entirely above the call agent range
//! mandated by RFC 3435 section 3.2.1.2, so a locally-generated identifier
//! can never collide with one assigned by a compliant peer.

use crate::config::TransactionConfig;
use mgcp_protocol::message::TransactionId;
use std::sync::atomic::{AtomicU32, Ordering};

/// Wrapping allocator for locally-generated transaction identifiers.
///
/// Identifiers increase monotonically from the floor and wrap back to it
/// after the ceiling has been handed out. Allocation is a single atomic
/// compare-exchange, safe under any number of concurrent callers, and never
/// yields the reserved identifier 0.
#[derive(Debug)]
pub struct TransactionNumberspace {
    next: AtomicU32,
    floor: u32,
    ceiling: u32,
}

impl TransactionNumberspace {
    /// Create a numberspace over `floor..=ceiling`.
    ///
    /// The configuration layer validates the range; a floor of 0 is lifted
    /// to 1 here so the reserved identifier can never be handed out.
    #[must_use]
    pub fn new(floor: u32, ceiling: u32) -> Self {
        let floor = floor.max(1);
        Self {
            next: AtomicU32::new(floor),
            floor,
            ceiling: ceiling.max(floor),
        }
    }

    /// Create a numberspace over the configured identifier range.
    #[must_use]
    pub fn from_config(config: &TransactionConfig) -> Self {
        Self::new(config.id_floor, config.id_ceiling)
    }

    /// Allocate a fresh transaction identifier.
    #[must_use]
    pub fn generate_id(&self) -> TransactionId {
        let mut current = self.next.load(Ordering::Relaxed);
        loop {
            let successor = if current >= self.ceiling {
                self.floor
            } else {
                current + 1
            };
            match self.next.compare_exchange_weak(
                current,
                successor,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(assigned) => return TransactionId::new(assigned),
                Err(observed) => current = observed,
            }
        }
    }

    /// Lowest identifier this numberspace hands out.
    #[must_use]
    pub const fn floor(&self) -> u32 {
        self.floor
    }

    /// Highest identifier this numberspace hands out.
    #[must_use]
    pub const fn ceiling(&self) -> u32 {
        self.ceiling
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_generates_monotonically_from_floor() {
        let numberspace = TransactionNumberspace::new(100, 200);

        assert_eq!(numberspace.generate_id(), TransactionId::new(100));
        assert_eq!(numberspace.generate_id(), TransactionId::new(101));
        assert_eq!(numberspace.generate_id(), TransactionId::new(102));
    }

    #[test]
    fn test_wraps_to_floor_at_ceiling() {
        let numberspace = TransactionNumberspace::new(10, 12);

        assert_eq!(numberspace.generate_id(), TransactionId::new(10));
        assert_eq!(numberspace.generate_id(), TransactionId::new(11));
        assert_eq!(numberspace.generate_id(), TransactionId::new(12));
        assert_eq!(numberspace.generate_id(), TransactionId::new(10));
    }

    #[test]
    fn test_never_generates_zero() {
        let numberspace = TransactionNumberspace::new(0, 2);

        for _ in 0..10 {
            assert!(!numberspace.generate_id().is_unassigned());
        }
    }

    #[test]
    fn test_single_value_range_pins_the_generator() {
        let numberspace = TransactionNumberspace::new(147_483_653, 147_483_653);

        assert_eq!(numberspace.generate_id(), TransactionId::new(147_483_653));
        assert_eq!(numberspace.generate_id(), TransactionId::new(147_483_653));
    }

    #[test]
    fn test_concurrent_generation_yields_unique_ids() {
        let numberspace = Arc::new(TransactionNumberspace::new(1_000_000_000, 2_147_483_647));
        let threads = 8;
        let per_thread = 1_000;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let numberspace = Arc::clone(&numberspace);
                std::thread::spawn(move || {
                    (0..per_thread)
                        .map(|_| numberspace.generate_id())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().expect("Generator thread should not panic") {
                assert!(seen.insert(id), "Duplicate transaction id {id}");
            }
        }
        assert_eq!(seen.len(), threads * per_thread);
    }
}
