//! Composite keys with a defined ordering.
//!
//! Field order matters: derived `Ord` compares fields top to bottom, so every
//! key sorts by its leading component first and range scans over that
//! component are contiguous.

use cohort_types::{Address, ProposalId};
use serde::{Deserialize, Serialize};

/// `participants` key: one entry per `(proposal, address)`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticipantKey {
    pub proposal: ProposalId,
    pub address: Address,
}

impl ParticipantKey {
    pub fn new(proposal: ProposalId, address: Address) -> Self {
        Self { proposal, address }
    }

    /// Smallest key for `proposal`; the inclusive lower bound of a range scan.
    pub fn first(proposal: ProposalId) -> Self {
        Self::new(proposal, Address::min())
    }
}

/// `enumeration` key: dense, append-only ordinals per proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrdinalKey {
    pub proposal: ProposalId,
    pub ordinal: u32,
}

impl OrdinalKey {
    pub fn new(proposal: ProposalId, ordinal: u32) -> Self {
        Self { proposal, ordinal }
    }

    pub fn first(proposal: ProposalId) -> Self {
        Self::new(proposal, 0)
    }

    pub fn last(proposal: ProposalId) -> Self {
        Self::new(proposal, u32::MAX)
    }
}

/// `reverse` key: which proposals an address belongs to.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MembershipKey {
    pub address: Address,
    pub proposal: ProposalId,
}

impl MembershipKey {
    pub fn new(address: Address, proposal: ProposalId) -> Self {
        Self { address, proposal }
    }

    pub fn first(address: Address) -> Self {
        Self::new(address, ProposalId::new(0))
    }

    pub fn last(address: Address) -> Self {
        Self::new(address, ProposalId::new(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participant_keys_group_by_proposal() {
        let a = ParticipantKey::new(ProposalId::new(1), Address::new("ZZZ"));
        let b = ParticipantKey::new(ProposalId::new(2), Address::new("AAA"));
        assert!(a < b);
        assert!(ParticipantKey::first(ProposalId::new(2)) < b);
        assert!(ParticipantKey::first(ProposalId::new(2)) > a);
    }

    #[test]
    fn ordinal_bounds_cover_the_proposal() {
        let id = ProposalId::new(7);
        let k = OrdinalKey::new(id, 42);
        assert!(OrdinalKey::first(id) <= k && k <= OrdinalKey::last(id));
        assert!(OrdinalKey::last(ProposalId::new(6)) < OrdinalKey::first(id));
    }

    #[test]
    fn membership_keys_group_by_address() {
        let addr = Address::new("SP1");
        let k = MembershipKey::new(addr.clone(), ProposalId::new(3));
        assert!(MembershipKey::first(addr.clone()) <= k);
        assert!(k <= MembershipKey::last(addr));
    }
}
