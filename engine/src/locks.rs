//! Per-proposal advisory locks.
//!
//! Calls on the same proposal are strictly ordered; calls on different
//! proposals run in parallel. Slots are created on first use. A slot is only
//! dropped by [`ProposalLocks::cleanup`] when nobody holds or waits on it, so
//! two callers always agree on the mutex for an id.

use cohort_types::ProposalId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct ProposalLocks {
    slots: Mutex<HashMap<ProposalId, Arc<Mutex<()>>>>,
}

impl ProposalLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: ProposalId) -> Arc<Mutex<()>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(id).or_default())
    }

    /// Run `f` while holding the lock for `id`.
    pub fn with<T>(&self, id: ProposalId, f: impl FnOnce() -> T) -> T {
        let slot = self.slot(id);
        let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }

    /// Drop slots nobody is holding or waiting on.
    pub fn cleanup(&self) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let before = slots.len();
        slots.retain(|_, slot| Arc::strong_count(slot) > 1);
        tracing::trace!(released = before - slots.len(), "lock slots cleaned up");
    }

    /// Number of live slots.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::thread;

    #[test]
    fn same_proposal_calls_do_not_interleave() {
        let locks = Arc::new(ProposalLocks::new());
        let inside = Arc::new(AtomicU32::new(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let inside = Arc::clone(&inside);
                thread::spawn(move || {
                    for _ in 0..100 {
                        locks.with(ProposalId::new(1), || {
                            assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                            inside.fetch_sub(1, Ordering::SeqCst);
                        });
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(locks.len(), 1);
    }

    #[test]
    fn returns_closure_value() {
        let locks = ProposalLocks::new();
        assert_eq!(locks.with(ProposalId::new(3), || 42), 42);
        assert!(!locks.is_empty());
    }

    #[test]
    fn cleanup_keeps_held_slots() {
        let locks = Arc::new(ProposalLocks::new());
        locks.with(ProposalId::new(1), || ());
        locks.with(ProposalId::new(2), || {
            locks.cleanup();
            assert_eq!(locks.len(), 1);
        });
        locks.cleanup();
        assert!(locks.is_empty());
        assert_eq!(locks.with(ProposalId::new(2), || 7), 7);
        assert_eq!(locks.len(), 1);
    }
}
