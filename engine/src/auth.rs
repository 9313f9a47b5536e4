//! Capability checks.
//!
//! Pure functions of caller identity and proposal data, independent of the
//! store.

use cohort_store::ProposalRecord;
use cohort_types::Address;

/// Holds the registry administrator and answers "may this caller do that".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Authority {
    admin: Address,
}

impl Authority {
    pub fn new(admin: Address) -> Self {
        Self { admin }
    }

    pub fn admin(&self) -> &Address {
        &self.admin
    }

    pub fn is_admin(&self, caller: &Address) -> bool {
        *caller == self.admin
    }

    /// Add participants, finalize, deploy: proposer or administrator.
    pub fn may_manage(&self, caller: &Address, proposal: &ProposalRecord) -> bool {
        *caller == proposal.proposer || self.is_admin(caller)
    }

    /// Record a payout: the participant itself or the administrator.
    pub fn may_claim(&self, caller: &Address, participant: &Address) -> bool {
        caller == participant || self.is_admin(caller)
    }
}
