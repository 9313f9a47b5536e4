//! Errors raised by ledger backends.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A batch tried to overwrite a write-once entry (an occupied ordinal).
    #[error("conflicting write: {0}")]
    Duplicate(String),

    #[error("could not encode or decode ledger state: {0}")]
    Serialization(String),

    /// The tables disagree with each other, or a counter ran out of range.
    #[error("ledger state is inconsistent: {0}")]
    Corruption(String),
}
