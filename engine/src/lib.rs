//! Proposal & whitelist allocation engine.
//!
//! A build proposal gathers participants until a quorum is reached, then
//! moves into an irreversible deployment phase. The engine is the
//! authoritative ledger for that lifecycle:
//!
//! - **Registry** (`registry`): creates proposals and drives the
//!   `Gathering -> ThresholdMet -> Deployed` status machine.
//! - **Whitelist** (`whitelist`): gates, deduplicates and counts participants,
//!   and detects quorum.
//! - **Allocation** (`allocation`, `finalize`): converts the final roster into
//!   basis-point shares that sum to exactly 10000, and token amounts per pool.
//!
//! The engine never moves funds. It computes and records allocation
//! instructions; an external issuer pays them out and reports back through
//! [`Engine::mark_claimed`].

pub mod allocation;
pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod finalize;
pub mod locks;
pub mod oracle;
pub mod registry;
pub mod stats;
pub mod whitelist;

pub use allocation::{
    pool_amount, split_basis_points, token_amount, AllocationLine, AllocationPlan, SplitPolicy,
};
pub use auth::Authority;
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::EngineError;
pub use event::{EngineEvent, EventBus};
pub use locks::ProposalLocks;
pub use oracle::VerificationOracle;
pub use registry::NewProposal;
pub use stats::EngineStats;
pub use whitelist::Candidate;
