//! Fundamental types for the cohort proposal ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! participant addresses, proposal ids, logical timestamps, basis points,
//! token amounts, proposal status, and the allocation pool split.

pub mod address;
pub mod amount;
pub mod bps;
pub mod error;
pub mod id;
pub mod params;
pub mod status;
pub mod time;

pub use address::Address;
pub use amount::TokenAmount;
pub use bps::{BasisPoints, BP_SCALE};
pub use error::TypesError;
pub use id::ProposalId;
pub use params::{AllocationPool, PoolSplit};
pub use status::ProposalStatus;
pub use time::LogicalTime;
