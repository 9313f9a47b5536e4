//! Nullable clock: deterministic logical time for testing.

use cohort_types::LogicalTime;
use std::sync::atomic::{AtomicU64, Ordering};

/// A deterministic logical clock.
///
/// Time only advances when you tell it to. Shareable across threads.
pub struct NullClock {
    current: AtomicU64,
}

impl NullClock {
    pub fn new(initial: u64) -> Self {
        Self {
            current: AtomicU64::new(initial),
        }
    }

    /// Get the current time.
    pub fn now(&self) -> LogicalTime {
        LogicalTime::new(self.current.load(Ordering::SeqCst))
    }

    /// Advance by one tick and return the new time.
    pub fn tick(&self) -> LogicalTime {
        LogicalTime::new(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl Default for NullClock {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_moves_when_told() {
        let clock = NullClock::new(5);
        assert_eq!(clock.now(), LogicalTime::new(5));
        assert_eq!(clock.tick(), LogicalTime::new(6));
        assert_eq!(clock.now(), LogicalTime::new(6));
    }
}
