//! Logical timestamps.
//!
//! The hosting environment supplies a monotonic logical clock (block height,
//! sequence number, ...). The engine never reads wall time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A tick of the environment's monotonic logical clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LogicalTime(u64);

impl LogicalTime {
    /// Time zero.
    pub const ORIGIN: Self = Self(0);

    pub const fn new(tick: u64) -> Self {
        Self(tick)
    }

    pub const fn tick(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LogicalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}
