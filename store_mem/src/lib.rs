//! Ordered in-memory storage backend for the cohort proposal ledger.
//!
//! Implements all storage traits from `cohort-store` on top of `BTreeMap`
//! tables, so composite-key lookups and range scans by proposal id behave the
//! way they would on an ordered embedded KV store. The whole state can be
//! serialised with `bincode` for snapshots and byte-for-byte comparisons.

pub mod error;
pub mod store;
pub mod tables;

pub use error::MemStoreError;
pub use store::MemStore;
