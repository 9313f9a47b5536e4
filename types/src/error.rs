//! Errors raised while validating fundamental types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("allocation pools sum to {sum} basis points, expected 10000")]
    PoolSumMismatch { sum: u64 },

    #[error("invalid address: {0}")]
    InvalidAddress(String),
}
