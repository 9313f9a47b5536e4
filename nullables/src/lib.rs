//! Nullable infrastructure for deterministic testing.
//!
//! The engine takes its two outside inputs, the logical clock and the
//! verifier's verdict, as plain arguments. This crate provides test-friendly
//! sources for both that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Record what they were asked, for assertions

pub mod clock;
pub mod verifier;

pub use clock::NullClock;
pub use verifier::NullVerifier;
