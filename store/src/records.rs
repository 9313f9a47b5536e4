//! Stored records.

use cohort_types::{Address, BasisPoints, LogicalTime, ProposalId, ProposalStatus};
use serde::{Deserialize, Serialize};

/// A build proposal. Owned by the proposal registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub id: ProposalId,
    /// Originating discussion post. Immutable.
    pub external_ref: String,
    /// Creator. Immutable.
    pub proposer: Address,
    pub name: String,
    /// Token ticker, upper case.
    pub symbol: String,
    pub description: String,
    /// Authoritative number of whitelisted entries, proposer included.
    pub participant_count: u32,
    pub status: ProposalStatus,
    /// Set once, on deployment.
    pub token_ref: Option<String>,
    /// Set once, on deployment.
    pub treasury_ref: Option<String>,
    pub created_at: LogicalTime,
    pub threshold_met_at: Option<LogicalTime>,
    /// Present while the stored allocations are final. Cleared when a
    /// participant joins after finalization.
    pub finalized_at: Option<LogicalTime>,
    pub deployed_at: Option<LogicalTime>,
}

impl ProposalRecord {
    pub fn is_deployed(&self) -> bool {
        self.status == ProposalStatus::Deployed
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized_at.is_some()
    }
}

/// A whitelisted participant. Owned by the whitelist manager.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub address: Address,
    pub display_name: String,
    /// Verifier verdict captured at add time; never re-checked.
    pub verified: bool,
    /// Share of the participant pool.
    pub allocation_bp: BasisPoints,
    /// Position in the enumeration index.
    pub ordinal: u32,
    pub added_at: LogicalTime,
    /// Set once, when the issuer reports a payout.
    pub claimed: bool,
    /// Discussion reply the participant joined from, if any.
    pub source_ref: Option<String>,
}
