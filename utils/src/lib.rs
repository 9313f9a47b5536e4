//! Shared utilities for the cohort proposal ledger.

pub mod logging;

pub use logging::{init_logging, LogFormat};
