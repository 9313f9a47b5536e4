//! Abstract storage traits for the cohort proposal ledger.
//!
//! Persisted state is four logical tables plus two pieces of bookkeeping:
//!
//! | table         | key                        | value                |
//! |---------------|----------------------------|----------------------|
//! | `proposals`   | `ProposalId`               | [`ProposalRecord`]   |
//! | `participants`| `(ProposalId, Address)`    | [`ParticipantRecord`]|
//! | `enumeration` | `(ProposalId, ordinal)`    | `Address`            |
//! | `reverse`     | `(Address, ProposalId)`    | membership flag      |
//!
//! plus the proposal counter and the external-reference bindings.
//!
//! Every backend (in-memory, embedded KV) implements these traits. Reads go
//! through [`ProposalStore`] and [`ParticipantStore`]; all mutation goes
//! through [`LedgerStore::commit`] so a call's effects land all-or-nothing.

pub mod error;
pub mod keys;
pub mod participant;
pub mod proposal;
pub mod records;
pub mod write_batch;

pub use error::StoreError;
pub use keys::{MembershipKey, OrdinalKey, ParticipantKey};
pub use participant::ParticipantStore;
pub use proposal::ProposalStore;
pub use records::{ParticipantRecord, ProposalRecord};
pub use write_batch::{WriteBatch, WriteOp};

/// A complete ledger backend: readable tables plus atomic batch commit.
pub trait LedgerStore: ProposalStore + ParticipantStore + Send + Sync {
    /// Apply every operation in `batch`, or none of them.
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}
